//! Record filters for `find` and `delete_many`

use super::Document;
use serde_json::Value;

/// One condition on a (possibly dotted) field path
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the value. A missing field equals `null`.
    Eq(String, Value),
    /// Field equals one of the values. An empty set matches nothing.
    In(String, Vec<Value>),
    /// Field is an array containing the value
    Contains(String, Value),
}

/// A conjunction of conditions. The empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    /// Match every record
    pub fn all() -> Self {
        Self::default()
    }

    /// Add an equality condition
    pub fn eq(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq(path.into(), value.into()));
        self
    }

    /// Add an "id in set" condition
    pub fn is_in<I, V>(mut self, path: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.conditions.push(Condition::In(path.into(), values));
        self
    }

    /// Add an "array contains" condition
    pub fn contains(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions
            .push(Condition::Contains(path.into(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Evaluate the filter against a record
    pub fn matches(&self, doc: &Document) -> bool {
        self.conditions.iter().all(|c| match c {
            Condition::Eq(path, value) => lookup(doc, path).unwrap_or(&Value::Null) == value,
            Condition::In(path, values) => {
                lookup(doc, path).is_some_and(|field| values.contains(field))
            }
            Condition::Contains(path, value) => lookup(doc, path)
                .and_then(Value::as_array)
                .is_some_and(|items| items.contains(value)),
        })
    }
}

/// Resolve a dotted path ("provider_ids.github") inside a record
pub fn lookup<'a>(doc: &'a Document, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = doc.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}
