//! Forgiving input parsing for planboard operations
//!
//! Accepts any of these shapes, alone or in an array:
//!
//! ```json
//! { "op": "add card", "board": "...", "title": "..." }
//! { "verb": "add", "noun": "card", "board": "...", "title": "..." }
//! { "add": "card", "board": "...", "title": "..." }
//! ```
//!
//! and normalizes them to canonical [`Operation`]s: verb aliases resolved,
//! camelCase keys converted, id aliases folded (`cardId` → `id` on a card
//! operation, `cardId` → `card` elsewhere), `actor` extracted.

use crate::error::{PlanError, Result};
use crate::types::{Noun, Operation, Verb};
use serde_json::{Map, Value};

/// Keys that describe the operation rather than its parameters
const META_KEYS: [&str; 2] = ["actor", "note"];

/// Parse input JSON into one or more Operations
pub fn parse_input(input: Value) -> Result<Vec<Operation>> {
    match input {
        Value::Array(arr) => arr.into_iter().map(parse_single).collect(),
        Value::Object(obj) => Ok(vec![parse_single(Value::Object(obj))?]),
        _ => Err(PlanError::parse("input must be an object or array")),
    }
}

/// Parse a JSON string, as read from the command line or stdin
pub fn parse_str(input: &str) -> Result<Vec<Operation>> {
    let value: Value = serde_json::from_str(input)
        .map_err(|e| PlanError::parse(format!("input is not JSON: {e}")))?;
    parse_input(value)
}

fn parse_single(input: Value) -> Result<Operation> {
    let obj = match input {
        Value::Object(obj) => obj,
        _ => return Err(PlanError::parse("operation must be an object")),
    };

    let (verb, noun, mut params) = extract_operation(&obj)?;

    let actor = obj
        .get("actor")
        .and_then(Value::as_str)
        .filter(|a| !a.trim().is_empty())
        .map(str::to_string);

    normalize_params(noun, &mut params);

    let mut operation = Operation::new(verb, noun, params);
    if let Some(actor) = actor {
        operation = operation.with_actor(actor);
    }
    Ok(operation)
}

fn extract_operation(obj: &Map<String, Value>) -> Result<(Verb, Noun, Map<String, Value>)> {
    // "op": "verb noun"
    if let Some(op) = obj
        .get("op")
        .or_else(|| obj.get("operation"))
        .and_then(Value::as_str)
    {
        let (verb, noun) = parse_op_string(op)
            .ok_or_else(|| PlanError::parse(format!("unrecognized operation: {op:?}")))?;
        return Ok((verb, noun, without_keys(obj, &["op", "operation"])));
    }

    // "verb": ..., "noun": ...
    let verb_value = obj.get("verb").or_else(|| obj.get("action"));
    let noun_value = obj.get("noun").or_else(|| obj.get("target"));
    if let (Some(v), Some(n)) = (
        verb_value.and_then(Value::as_str),
        noun_value.and_then(Value::as_str),
    ) {
        let verb = Verb::from_alias(v)
            .ok_or_else(|| PlanError::parse(format!("unrecognized verb: {v:?}")))?;
        let noun =
            Noun::parse(n).ok_or_else(|| PlanError::parse(format!("unrecognized noun: {n:?}")))?;
        return Ok((
            verb,
            noun,
            without_keys(obj, &["verb", "action", "noun", "target"]),
        ));
    }

    // shorthand: "add": "card"
    for (key, value) in obj {
        let (Some(verb), Some(noun)) = (
            Verb::from_alias(key),
            value.as_str().and_then(Noun::parse),
        ) else {
            continue;
        };
        return Ok((verb, noun, without_keys(obj, &[key.as_str()])));
    }

    Err(PlanError::parse("cannot determine operation from input"))
}

/// Parse an op string like "add card" or "remove_member project"
fn parse_op_string(s: &str) -> Option<(Verb, Noun)> {
    let mut parts = s.split_whitespace();
    let (verb, noun) = (parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    Some((Verb::from_alias(verb)?, Noun::parse(noun)?))
}

fn without_keys(obj: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    obj.iter()
        .filter(|(k, _)| !keys.contains(&k.as_str()) && !META_KEYS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Normalize parameter keys: snake_case, then id and field aliases
fn normalize_params(noun: Noun, params: &mut Map<String, Value>) {
    let keys: Vec<String> = params.keys().cloned().collect();
    for key in keys {
        let snake = to_snake_case(&key);
        if snake != key {
            rename(params, &key, &snake);
        }
    }

    // `<noun>_id` is this operation's own id; other `<noun>_id`s are references
    let own_id = format!("{}_id", noun.as_str());
    rename(params, &own_id, "id");
    for reference in ["project", "board", "card", "comment", "user"] {
        rename(params, &format!("{reference}_id"), reference);
    }

    let aliases: &[(&[&str], &str)] = match noun {
        Noun::Comment => &[
            (&["author", "author_id", "user"], "created_by"),
            (&["body", "text"], "content"),
        ],
        Noun::Card => &[
            (&["desc", "body"], "description"),
            (&["assignee_id", "user"], "assignee"),
            (&["name"], "title"),
            (&["due", "due_date"], "due_on"),
        ],
        Noun::Board => &[(&["title"], "name"), (&["owner_id"], "owner")],
        Noun::Project => &[(&["title"], "name"), (&["member"], "user")],
        Noun::User => &[(&["display_name"], "name"), (&["avatar"], "picture")],
        Noun::Activity => &[(&["entity_id"], "entity")],
    };
    for (from_keys, to_key) in aliases {
        for from_key in *from_keys {
            rename(params, from_key, to_key);
        }
    }
}

/// Move `from` to `to` unless `to` is already set
fn rename(params: &mut Map<String, Value>, from: &str, to: &str) {
    if from == to {
        return;
    }
    if let Some(value) = params.remove(from) {
        if !params.contains_key(to) {
            params.insert(to.to_string(), value);
        }
    }
}

/// camelCase to snake_case
fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            result.push('_');
        }
        result.extend(c.to_lowercase());
    }
    result
}
