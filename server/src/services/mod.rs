//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own validation and persistence so route handlers can stay
//! focused on protocol translation. Every query is scoped to the acting user.

pub mod folder;
pub mod play;

use serde_json::Value;

/// Longest accepted folder or play name, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// Validate a required name field from a JSON body.
///
/// The returned message is already in `<field>: <problem>` form.
pub(crate) fn validate_name(field: &str, value: Option<&Value>) -> Result<String, String> {
    let name = match value {
        None | Some(Value::Null) => return Err(format!("{field}: required")),
        Some(Value::String(name)) => name,
        Some(_) => return Err(format!("{field}: must be a string")),
    };
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(format!("{field}: must not be blank"));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(format!("{field}: must be at most {MAX_NAME_LEN} characters"));
    }
    Ok(trimmed.to_owned())
}

/// Validate a required UUID field from a JSON body.
pub(crate) fn validate_uuid(field: &str, value: Option<&Value>) -> Result<uuid::Uuid, String> {
    match value {
        None | Some(Value::Null) => Err(format!("{field}: required")),
        Some(Value::String(raw)) => raw.parse().map_err(|_| format!("{field}: must be a UUID")),
        Some(_) => Err(format!("{field}: must be a UUID")),
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
