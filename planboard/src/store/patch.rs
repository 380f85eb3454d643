//! Field-level partial updates applied to one record at a time

use super::Document;
use crate::error::{PlanError, Result};
use serde_json::{Map, Value};

/// An update to one field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOp {
    /// Replace the field's value
    Set(Value),
    /// Remove the field
    Unset,
    /// Append to an array field unless already present
    AddToSet(Value),
    /// Remove every occurrence from an array field
    Pull(Value),
    /// Remove every occurrence of each value from an array field
    PullAll(Vec<Value>),
    /// Insert into an array field at `position`, clamped to the array length
    InsertAt { value: Value, position: usize },
}

/// An ordered list of field updates, applied in sequence to a single record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    ops: Vec<(String, FieldOp)>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push((path.into(), FieldOp::Set(value.into())));
        self
    }

    pub fn unset(mut self, path: impl Into<String>) -> Self {
        self.ops.push((path.into(), FieldOp::Unset));
        self
    }

    pub fn add_to_set(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push((path.into(), FieldOp::AddToSet(value.into())));
        self
    }

    pub fn pull(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push((path.into(), FieldOp::Pull(value.into())));
        self
    }

    pub fn pull_all<I, V>(mut self, path: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.ops.push((path.into(), FieldOp::PullAll(values)));
        self
    }

    pub fn insert_at(
        mut self,
        path: impl Into<String>,
        value: impl Into<Value>,
        position: usize,
    ) -> Self {
        self.ops.push((
            path.into(),
            FieldOp::InsertAt {
                value: value.into(),
                position,
            },
        ));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[(String, FieldOp)] {
        &self.ops
    }

    /// Apply every op to `doc`. On error `doc` may be partially modified;
    /// stores apply patches to a copy.
    pub fn apply(&self, doc: &mut Document) -> Result<()> {
        for (path, op) in &self.ops {
            if path == "id" {
                return Err(PlanError::invalid_value("id", "the id field cannot be patched"));
            }
            apply_op(doc, path, op)?;
        }
        Ok(())
    }
}

fn apply_op(doc: &mut Document, path: &str, op: &FieldOp) -> Result<()> {
    let (parent, field) = match path.rsplit_once('.') {
        Some((parent, field)) => {
            let create = !matches!(op, FieldOp::Unset | FieldOp::Pull(_) | FieldOp::PullAll(_));
            match container_mut(doc, parent, create)? {
                Some(map) => (map, field),
                None => return Ok(()),
            }
        }
        None => (doc, path),
    };

    match op {
        FieldOp::Set(value) => {
            parent.insert(field.to_string(), value.clone());
        }
        FieldOp::Unset => {
            parent.remove(field);
        }
        FieldOp::AddToSet(value) => {
            let items = array_mut(parent, field, path, true)?;
            if let Some(items) = items {
                if !items.contains(value) {
                    items.push(value.clone());
                }
            }
        }
        FieldOp::Pull(value) => {
            if let Some(items) = array_mut(parent, field, path, false)? {
                items.retain(|item| item != value);
            }
        }
        FieldOp::PullAll(values) => {
            if let Some(items) = array_mut(parent, field, path, false)? {
                items.retain(|item| !values.contains(item));
            }
        }
        FieldOp::InsertAt { value, position } => {
            if let Some(items) = array_mut(parent, field, path, true)? {
                let index = (*position).min(items.len());
                items.insert(index, value.clone());
            }
        }
    }
    Ok(())
}

/// Walk to the object holding the last path segment, optionally creating it
fn container_mut<'a>(
    doc: &'a mut Document,
    parent: &str,
    create: bool,
) -> Result<Option<&'a mut Map<String, Value>>> {
    let mut current = doc;
    for segment in parent.split('.') {
        if matches!(current.get(segment), None | Some(Value::Null)) {
            if !create {
                return Ok(None);
            }
            current.insert(segment.to_string(), Value::Object(Map::new()));
        }
        current = match current.get_mut(segment) {
            Some(Value::Object(map)) => map,
            _ => return Err(PlanError::invalid_value(parent, "not an object")),
        };
    }
    Ok(Some(current))
}

/// The array stored at `field`. Missing or null fields become an empty array
/// when `create` is set and are skipped otherwise.
fn array_mut<'a>(
    parent: &'a mut Map<String, Value>,
    field: &str,
    path: &str,
    create: bool,
) -> Result<Option<&'a mut Vec<Value>>> {
    let missing = matches!(parent.get(field), None | Some(Value::Null));
    if missing {
        if !create {
            return Ok(None);
        }
        parent.insert(field.to_string(), Value::Array(Vec::new()));
    }
    match parent.get_mut(field) {
        Some(Value::Array(items)) => Ok(Some(items)),
        _ => Err(PlanError::invalid_value(path, "not an array")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_set_and_unset() {
        let mut card = doc(json!({"id": "c1", "title": "a", "assignee": "u1"}));
        Patch::new()
            .set("title", "b")
            .unset("assignee")
            .apply(&mut card)
            .unwrap();
        assert_eq!(card["title"], "b");
        assert!(!card.contains_key("assignee"));
    }

    #[test]
    fn test_id_cannot_be_patched() {
        let mut card = doc(json!({"id": "c1"}));
        let err = Patch::new().set("id", "c2").apply(&mut card).unwrap_err();
        assert!(matches!(err, PlanError::InvalidValue { .. }));
    }

    #[test]
    fn test_add_to_set_and_pull() {
        let mut board = doc(json!({"id": "b1"}));
        Patch::new()
            .add_to_set("cards", "c1")
            .add_to_set("cards", "c2")
            .add_to_set("cards", "c1")
            .apply(&mut board)
            .unwrap();
        assert_eq!(board["cards"], json!(["c1", "c2"]));

        Patch::new().pull("cards", "c1").apply(&mut board).unwrap();
        assert_eq!(board["cards"], json!(["c2"]));

        // pulling from a missing list is a no-op
        Patch::new().pull("users", "u1").apply(&mut board).unwrap();
        assert!(!board.contains_key("users"));
    }

    #[test]
    fn test_pull_all() {
        let mut card = doc(json!({"id": "c1", "comments": ["a", "b", "c", "a"]}));
        Patch::new()
            .pull_all("comments", ["a", "c"])
            .apply(&mut card)
            .unwrap();
        assert_eq!(card["comments"], json!(["b"]));
    }

    #[test]
    fn test_insert_at_clamps() {
        let mut board = doc(json!({"id": "b1", "cards": ["a", "b"]}));
        Patch::new()
            .insert_at("cards", "x", 0)
            .insert_at("cards", "y", 99)
            .apply(&mut board)
            .unwrap();
        assert_eq!(board["cards"], json!(["x", "a", "b", "y"]));
    }

    #[test]
    fn test_dotted_set_creates_nested_map() {
        let mut user = doc(json!({"id": "u1"}));
        Patch::new()
            .set("provider_ids.github", "42")
            .apply(&mut user)
            .unwrap();
        assert_eq!(user["provider_ids"]["github"], "42");

        Patch::new()
            .unset("provider_ids.github")
            .unset("provider_ids.google")
            .apply(&mut user)
            .unwrap();
        assert_eq!(user["provider_ids"], json!({}));
    }

    #[test]
    fn test_non_array_field_rejected() {
        let mut card = doc(json!({"id": "c1", "title": "t"}));
        assert!(Patch::new()
            .add_to_set("title", "x")
            .apply(&mut card)
            .is_err());
    }
}
