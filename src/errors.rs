// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchhookError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("callback '{name}' syntax error: {reason}")]
    CallbackSyntax { name: String, reason: String },

    #[error("task '{name}' syntax error: {reason}")]
    TaskSyntax { name: String, reason: String },

    #[error("{entity} '{name}' has unsupported type '{variant}'")]
    UnsupportedVariant {
        entity: &'static str,
        name: String,
        variant: String,
    },

    #[error("undefined attribute '{key}'")]
    UndefinedAttribute { key: String },

    #[error("circular attribute reference: {}", chain.join(" -> "))]
    CircularAttribute { chain: Vec<String> },

    #[error("watch path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("file watch error: {0}")]
    Watch(#[from] notify::Error),

    /// Raised by the watch backend when its event source is torn down
    /// while another waiter still holds it. Only seen during drain.
    #[error("watch resource already acquired: {0}")]
    WatchAlreadyAcquired(String),

    #[error("cancelled")]
    Cancelled,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WatchhookError {
    /// Undefined or circular attribute: recoverable per event.
    pub fn is_attribute_error(&self) -> bool {
        matches!(
            self,
            WatchhookError::UndefinedAttribute { .. } | WatchhookError::CircularAttribute { .. }
        )
    }

    pub fn is_cancellation(&self) -> bool {
        matches!(self, WatchhookError::Cancelled)
    }

    /// Errors that are expected while the runner cancels its units and are
    /// never reported to the operator.
    pub fn is_drain_artifact(&self) -> bool {
        matches!(
            self,
            WatchhookError::Cancelled | WatchhookError::WatchAlreadyAcquired(_)
        )
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, WatchhookError>;
