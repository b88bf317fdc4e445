// src/attrs.rs

//! Attribute maps and `{key}` template expansion.
//!
//! Templates reference attributes by name: `cp {path} {dest}`. An attribute
//! value may itself be a template, so `{dest}` can expand to `{root}/out`
//! and then further to `/srv/out`. Expansion tracks the chain of keys
//! currently being expanded and fails as soon as a key re-enters it.
//!
//! Only identifier-like names are placeholders (`[A-Za-z_][A-Za-z0-9_.-]*`),
//! so shell snippets such as `awk '{print $1}'` or `find -exec {} \;` pass
//! through untouched. `{{` and `}}` produce literal braces.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{Result, WatchhookError};
use crate::types::Change;

/// String-keyed attribute map handed to callbacks.
pub type Attributes = BTreeMap<String, String>;

/// Attribute holding the change kind (`added`, `modified`, `deleted`).
pub const CHANGE_ATTR: &str = "change";
/// Attribute holding the path reported by the watch service.
pub const PATH_ATTR: &str = "path";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_.\-]*)\}").expect("placeholder regex is valid")
});

/// Right-biased union: keys in `event_attrs` win over `static_attrs`.
pub fn merge(static_attrs: &Attributes, event_attrs: &Attributes) -> Attributes {
    let mut merged = static_attrs.clone();
    merged.extend(
        event_attrs
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    );
    merged
}

/// Attributes derived from a single change: `{change, path}`.
pub fn event_attributes(change: &Change) -> Attributes {
    let mut attrs = Attributes::new();
    attrs.insert(CHANGE_ATTR.to_string(), change.kind.to_string());
    attrs.insert(
        PATH_ATTR.to_string(),
        change.path.to_string_lossy().into_owned(),
    );
    attrs
}

/// Expand every placeholder in `template` using `attrs`, transitively.
pub fn resolve(template: &str, attrs: &Attributes) -> Result<String> {
    let mut chain = Vec::new();
    expand(template, attrs, &mut chain)
}

fn expand(template: &str, attrs: &Attributes, chain: &mut Vec<String>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&template[last..whole.start()]);
        last = whole.end();

        let Some(key) = caps.get(1).map(|m| m.as_str()) else {
            // `{{` or `}}`
            out.push_str(&whole.as_str()[..1]);
            continue;
        };

        if chain.iter().any(|k| k == key) {
            let mut cycle = chain.clone();
            cycle.push(key.to_string());
            return Err(WatchhookError::CircularAttribute { chain: cycle });
        }

        let value = attrs
            .get(key)
            .ok_or_else(|| WatchhookError::UndefinedAttribute {
                key: key.to_string(),
            })?;

        chain.push(key.to_string());
        let expanded = expand(value, attrs, chain)?;
        chain.pop();

        out.push_str(&expanded);
    }

    out.push_str(&template[last..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChangeKind;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_simple_placeholders() {
        let a = attrs(&[("path", "/tmp/x"), ("dest", "/srv")]);
        assert_eq!(resolve("cp {path} {dest}", &a).unwrap(), "cp /tmp/x /srv");
    }

    #[test]
    fn expands_transitively() {
        let a = attrs(&[("dest", "{root}/out"), ("root", "/srv"), ("path", "f")]);
        assert_eq!(resolve("cp {path} {dest}", &a).unwrap(), "cp f /srv/out");
    }

    #[test]
    fn repeated_key_is_not_a_cycle() {
        let a = attrs(&[("x", "{y}"), ("y", "1")]);
        assert_eq!(resolve("{x}{x}{y}", &a).unwrap(), "111");
    }

    #[test]
    fn undefined_key_fails() {
        let err = resolve("echo {missing}", &attrs(&[("path", "p")])).unwrap_err();
        match err {
            WatchhookError::UndefinedAttribute { key } => assert_eq!(key, "missing"),
            other => panic!("expected UndefinedAttribute, got {other:?}"),
        }
    }

    #[test]
    fn undefined_key_deep_in_chain_fails() {
        let err = resolve("{a}", &attrs(&[("a", "{b}")])).unwrap_err();
        assert!(matches!(err, WatchhookError::UndefinedAttribute { ref key } if key == "b"));
    }

    #[test]
    fn two_key_cycle_fails() {
        let a = attrs(&[("a", "{b}"), ("b", "{a}")]);
        match resolve("{a}", &a).unwrap_err() {
            WatchhookError::CircularAttribute { chain } => {
                assert_eq!(chain, vec!["a", "b", "a"]);
            }
            other => panic!("expected CircularAttribute, got {other:?}"),
        }
    }

    #[test]
    fn self_reference_fails() {
        let a = attrs(&[("a", "x{a}")]);
        assert!(matches!(
            resolve("{a}", &a),
            Err(WatchhookError::CircularAttribute { .. })
        ));
    }

    #[test]
    fn shell_braces_are_literal() {
        let a = attrs(&[("path", "/tmp/x")]);
        assert_eq!(
            resolve("awk '{print $1}' {path}; find . -exec rm {} \\;", &a).unwrap(),
            "awk '{print $1}' /tmp/x; find . -exec rm {} \\;"
        );
        assert_eq!(resolve("echo {path", &a).unwrap(), "echo {path");
    }

    #[test]
    fn doubled_braces_escape() {
        let a = attrs(&[("path", "/tmp/x")]);
        assert_eq!(resolve("{{path}} {path}", &a).unwrap(), "{path} /tmp/x");
    }

    #[test]
    fn merge_prefers_event_attributes() {
        let stat = attrs(&[("path", "static"), ("dest", "d")]);
        let change = Change::new(ChangeKind::Deleted, "/tmp/gone");
        let merged = merge(&stat, &event_attributes(&change));
        assert_eq!(merged["path"], "/tmp/gone");
        assert_eq!(merged["change"], "deleted");
        assert_eq!(merged["dest"], "d");
    }
}
