//! Structural validation of untyped element collections.
//!
//! Play canvases arrive as arbitrary JSON (request bodies, imported files,
//! local snapshots). `validate_elements` walks the value and reports the
//! first rule it breaks with a path like `canvas[2].points`, then hands back
//! the typed collection.

#[cfg(test)]
#[path = "schema_test.rs"]
mod schema_test;

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::doc::{Element, ElementKind, Team};

/// The first schema violation found in a collection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{path}: {message}")]
pub struct SchemaError {
    /// Location of the offending value, e.g. `canvas[0].type`.
    pub path: String,
    /// What is wrong with it.
    pub message: String,
}

impl SchemaError {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { path: path.into(), message: message.into() }
    }
}

/// Validate `value` as an element array rooted at `root` (used as the path prefix).
///
/// # Errors
///
/// Returns the first violation encountered, in array order.
pub fn validate_elements(value: &Value, root: &str) -> Result<Vec<Element>, SchemaError> {
    let Some(items) = value.as_array() else {
        return Err(SchemaError::new(root, "expected an array of elements"));
    };

    let mut seen = HashSet::with_capacity(items.len());
    let mut elements = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let path = format!("{root}[{i}]");
        let element = validate_element(item, &path)?;
        if !seen.insert(element.id.clone()) {
            return Err(SchemaError::new(format!("{path}.id"), format!("duplicate id `{}`", element.id)));
        }
        elements.push(element);
    }
    Ok(elements)
}

/// Slack allowed between an arrow's `x`,`y` and the start it stores in `points`.
const ANCHOR_TOLERANCE: f64 = 1e-6;

fn validate_element(value: &Value, path: &str) -> Result<Element, SchemaError> {
    let Some(obj) = value.as_object() else {
        return Err(SchemaError::new(path, "expected an object"));
    };

    let id = match obj.get("id") {
        None | Some(Value::Null) => return Err(SchemaError::new(format!("{path}.id"), "required")),
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::String(_)) => return Err(SchemaError::new(format!("{path}.id"), "must not be empty")),
        Some(_) => return Err(SchemaError::new(format!("{path}.id"), "expected a string")),
    };

    let kind = match obj.get("type") {
        None | Some(Value::Null) => return Err(SchemaError::new(format!("{path}.type"), "required")),
        Some(Value::String(raw)) => ElementKind::parse(raw).ok_or_else(|| {
            SchemaError::new(
                format!("{path}.type"),
                format!("unknown element type `{raw}`; expected one of {}", kind_list()),
            )
        })?,
        Some(_) => return Err(SchemaError::new(format!("{path}.type"), "expected a string")),
    };

    let x = required_number(obj, "x", path)?;
    let y = required_number(obj, "y", path)?;
    let points = optional_points(obj, path)?;

    if kind.is_arrow() {
        match points.as_ref() {
            None => return Err(SchemaError::new(format!("{path}.points"), "required for arrow elements")),
            Some(p) if p.len() < 4 => {
                return Err(SchemaError::new(format!("{path}.points"), "expected at least 4 numbers"));
            }
            Some(p) => {
                if (x - p[0]).abs() > ANCHOR_TOLERANCE {
                    return Err(SchemaError::new(format!("{path}.x"), "must equal points[0] for arrow elements"));
                }
                if (y - p[1]).abs() > ANCHOR_TOLERANCE {
                    return Err(SchemaError::new(format!("{path}.y"), "must equal points[1] for arrow elements"));
                }
            }
        }
    } else if matches!(kind, ElementKind::Player | ElementKind::Ball) && points.is_some() {
        return Err(SchemaError::new(
            format!("{path}.points"),
            format!("not allowed on {} elements", kind.as_str()),
        ));
    }

    let position = optional_string(obj, "position", path)?;
    let text = optional_string(obj, "text", path)?;
    let team = match optional_string(obj, "team", path)? {
        None => None,
        Some(raw) => Some(
            Team::parse(&raw)
                .ok_or_else(|| SchemaError::new(format!("{path}.team"), "expected `blue` or `red`"))?,
        ),
    };

    Ok(Element { id, kind, x, y, points, position, team, text })
}

fn kind_list() -> String {
    ElementKind::ALL.map(ElementKind::as_str).join(", ")
}

fn required_number(obj: &Map<String, Value>, key: &str, path: &str) -> Result<f64, SchemaError> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(SchemaError::new(format!("{path}.{key}"), "required")),
        Some(v) => v
            .as_f64()
            .filter(|n| n.is_finite())
            .ok_or_else(|| SchemaError::new(format!("{path}.{key}"), "expected a number")),
    }
}

fn optional_string(obj: &Map<String, Value>, key: &str, path: &str) -> Result<Option<String>, SchemaError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(SchemaError::new(format!("{path}.{key}"), "expected a string")),
    }
}

fn optional_points(obj: &Map<String, Value>, path: &str) -> Result<Option<Vec<f64>>, SchemaError> {
    let items = match obj.get("points") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(SchemaError::new(format!("{path}.points"), "expected an array of numbers")),
    };
    let mut points = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let n = item
            .as_f64()
            .filter(|n| n.is_finite())
            .ok_or_else(|| SchemaError::new(format!("{path}.points[{i}]"), "expected a number"))?;
        points.push(n);
    }
    Ok(Some(points))
}
