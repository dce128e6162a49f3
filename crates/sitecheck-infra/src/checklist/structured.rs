//! JSON checklists
//!
//! Accepts either a top-level array of items, or an object holding the items
//! under `tasks`, `items` or `areas`. Each item is a string (the name) or a
//! record whose name sits in one of several fields, so exports from different
//! versions of the checklist tool all import.

use serde_json::Value;

use sitecheck_types::{Area, ChecklistError};

/// Record fields holding the area name, in priority order
const NAME_FIELDS: &[&str] = &["name", "task", "area", "title"];

/// Object fields holding the item list, in priority order
const LIST_FIELDS: &[&str] = &["tasks", "items", "areas"];

pub(super) fn parse_structured(content: &str, file_name: &str) -> Result<Vec<Area>, ChecklistError> {
    let data: Value = serde_json::from_str(content).map_err(|e| ChecklistError::Parse {
        file: file_name.to_string(),
        reason: e.to_string(),
    })?;

    let items = match &data {
        Value::Array(items) => items,
        Value::Object(map) => match LIST_FIELDS
            .iter()
            .find_map(|f| map.get(*f).filter(|v| is_truthy(v)).map(|v| (*f, v)))
        {
            Some((_, Value::Array(items))) => items,
            Some((field, _)) => {
                return Err(ChecklistError::Parse {
                    file: file_name.to_string(),
                    reason: format!("'{}' is not an array", field),
                })
            }
            None => return Ok(Vec::new()),
        },
        _ => return Ok(Vec::new()),
    };

    Ok(items.iter().filter_map(item_name).map(Area::new).collect())
}

/// Null, false, 0 and "" do not count as a present list field
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Name of one item, or `None` when it carries no usable name
fn item_name(item: &Value) -> Option<String> {
    let name = match item {
        Value::Object(map) => NAME_FIELDS
            .iter()
            .filter_map(|f| map.get(*f))
            .find_map(scalar_text)?,
        other => scalar_text(other)?,
    };

    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Textual form of a scalar; empty strings, null and containers have none
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
