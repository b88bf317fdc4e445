// src/callbacks/mod.rs

//! Reaction handlers invoked when a task observes a matching change.
//!
//! Every callback implements [`Callback`]. Concrete variants are selected by
//! the `type` field of their config fragment:
//!
//! - `shell`  -> [`ShellCallback`]: expand a command template and run it.
//! - `logger` -> [`LoggerCallback`]: expand a message template and emit it
//!   as a structured `tracing` event.
//!
//! Callbacks are immutable once built and are shared between tasks as
//! `Arc<dyn Callback>`.

pub mod logger;
pub mod registry;
pub mod shell;

use std::fmt;
use std::sync::Arc;

use serde_yaml::Value;

use crate::attrs::Attributes;
use crate::errors::{Result, WatchhookError};
use crate::exec::{CommandOutput, CommandRunner, ShellCommandRunner};
use crate::types::BoxFuture;

pub use logger::LoggerCallback;
pub use registry::CallbackRegistry;
pub use shell::ShellCallback;

/// What a callback produced for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// A shell command ran; its captured output.
    Command(CommandOutput),
    /// A log record was emitted with this resolved message.
    Logged(String),
}

/// A reaction handler.
pub trait Callback: Send + Sync + fmt::Debug {
    /// Unique name from the `callbacks` section.
    fn name(&self) -> &str;

    /// The `type` discriminator this callback was built from.
    fn kind(&self) -> &'static str;

    /// Handle one event for `task` with the merged attributes.
    ///
    /// Attribute errors are returned as-is; the calling task decides what to
    /// do with them.
    fn invoke<'a>(
        &'a self,
        task: &'a str,
        attrs: &'a Attributes,
    ) -> BoxFuture<'a, Result<CallbackOutcome>>;
}

/// Collaborators shared by every callback built from one config.
#[derive(Debug, Clone)]
pub struct CallbackContext {
    pub runner: Arc<dyn CommandRunner>,
}

impl CallbackContext {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

impl Default for CallbackContext {
    fn default() -> Self {
        Self::new(Arc::new(ShellCommandRunner))
    }
}

/// Build a callback from its config fragment, dispatching on `type`.
pub fn callback_from_config(
    name: &str,
    fragment: &Value,
    ctx: &CallbackContext,
) -> Result<Arc<dyn Callback>> {
    let variant = match fragment.get("type") {
        Some(Value::String(s)) => s.as_str(),
        Some(_) => {
            return Err(WatchhookError::CallbackSyntax {
                name: name.to_string(),
                reason: "field `type` must be a string".to_string(),
            });
        }
        None => {
            return Err(WatchhookError::CallbackSyntax {
                name: name.to_string(),
                reason: "missing field `type`".to_string(),
            });
        }
    };

    let callback: Arc<dyn Callback> = match variant {
        shell::KIND => Arc::new(ShellCallback::from_config(
            name,
            fragment,
            Arc::clone(&ctx.runner),
        )?),
        logger::KIND => Arc::new(LoggerCallback::from_config(name, fragment)?),
        other => {
            return Err(WatchhookError::UnsupportedVariant {
                entity: "callback",
                name: name.to_string(),
                variant: other.to_string(),
            });
        }
    };

    tracing::debug!(callback = %name, kind = callback.kind(), "callback initialized");
    Ok(callback)
}

/// Map a `serde_yaml` deserialization failure onto a callback syntax error.
pub(crate) fn syntax_error(name: &str, err: serde_yaml::Error) -> WatchhookError {
    WatchhookError::CallbackSyntax {
        name: name.to_string(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn builds_shell_callback() {
        let cb = callback_from_config(
            "copy",
            &yaml("type: shell\ncommand: cp {path} /tmp"),
            &CallbackContext::default(),
        )
        .unwrap();
        assert_eq!(cb.name(), "copy");
        assert_eq!(cb.kind(), "shell");
    }

    #[test]
    fn builds_logger_callback() {
        let cb = callback_from_config(
            "trace",
            &yaml("type: logger\nmessage: '{path} changed'"),
            &CallbackContext::default(),
        )
        .unwrap();
        assert_eq!(cb.kind(), "logger");
    }

    #[test]
    fn shell_without_command_is_syntax_error() {
        let err = callback_from_config("copy", &yaml("type: shell"), &CallbackContext::default())
            .unwrap_err();
        match err {
            WatchhookError::CallbackSyntax { name, reason } => {
                assert_eq!(name, "copy");
                assert!(reason.contains("command"), "reason: {reason}");
            }
            other => panic!("expected CallbackSyntax, got {other:?}"),
        }
    }

    #[test]
    fn missing_type_is_syntax_error() {
        let err = callback_from_config("x", &yaml("command: ls"), &CallbackContext::default())
            .unwrap_err();
        assert!(matches!(err, WatchhookError::CallbackSyntax { ref reason, .. } if reason.contains("type")));
    }

    #[test]
    fn unknown_type_is_unsupported() {
        let err = callback_from_config("x", &yaml("type: smtp"), &CallbackContext::default())
            .unwrap_err();
        match err {
            WatchhookError::UnsupportedVariant { entity, variant, .. } => {
                assert_eq!(entity, "callback");
                assert_eq!(variant, "smtp");
            }
            other => panic!("expected UnsupportedVariant, got {other:?}"),
        }
    }
}
