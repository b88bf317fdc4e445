// src/config/validate.rs

//! Structural checks on the raw document tree.
//!
//! These run before any entity is built, so a malformed section is reported
//! with the rule it breaks rather than as a deserialization error.

use serde_yaml::{Mapping, Value};

use crate::errors::{Result, WatchhookError};

/// The document root must be a mapping.
pub fn root_mapping(doc: &Value) -> Result<&Mapping> {
    doc.as_mapping().ok_or_else(|| {
        WatchhookError::Config("config document must be a mapping".to_string())
    })
}

/// Fetch a required top-level section and check it is a mapping.
pub fn require_section<'a>(doc: &'a Value, section: &str) -> Result<&'a Mapping> {
    let root = root_mapping(doc)?;
    match root.get(section) {
        None => Err(WatchhookError::Config(format!("{section} not defined"))),
        Some(Value::Mapping(m)) => Ok(m),
        Some(_) => Err(WatchhookError::Config(format!(
            "{section} must be a mapping"
        ))),
    }
}

/// Split a section into `(name, fragment)` entries, each fragment a mapping.
///
/// `entity` names the kind of entry for error messages (`callback`, `task`).
pub fn section_entries<'a>(
    section: &'a Mapping,
    entity: &str,
) -> Result<Vec<(&'a str, &'a Value)>> {
    section
        .iter()
        .map(|(key, value)| {
            let Value::String(name) = key else {
                return Err(WatchhookError::Config(format!(
                    "{entity} names must be strings (got {key:?})"
                )));
            };
            if !value.is_mapping() {
                return Err(WatchhookError::Config(format!(
                    "{name} {entity} data must be a mapping"
                )));
            }
            Ok((name.as_str(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    fn config_msg(err: WatchhookError) -> String {
        match err {
            WatchhookError::Config(msg) => msg,
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn root_must_be_mapping() {
        let msg = config_msg(require_section(&doc("- a\n- b"), "tasks").unwrap_err());
        assert!(msg.contains("must be a mapping"));
    }

    #[test]
    fn missing_section() {
        let msg = config_msg(require_section(&doc("callbacks: {}"), "tasks").unwrap_err());
        assert_eq!(msg, "tasks not defined");
    }

    #[test]
    fn section_must_be_mapping() {
        let msg = config_msg(require_section(&doc("tasks: [a, b]"), "tasks").unwrap_err());
        assert_eq!(msg, "tasks must be a mapping");
    }

    #[test]
    fn entries_must_be_mappings() {
        let d = doc("callbacks:\n  good: {type: shell}\n  bad: 42\n");
        let section = require_section(&d, "callbacks").unwrap();
        let msg = config_msg(section_entries(section, "callback").unwrap_err());
        assert_eq!(msg, "bad callback data must be a mapping");
    }
}
