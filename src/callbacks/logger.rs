// src/callbacks/logger.rs

use serde_yaml::Value;
use tracing::{debug, error, info, trace, warn};

use crate::attrs::{resolve, Attributes};
use crate::callbacks::{syntax_error, Callback, CallbackOutcome};
use crate::config::model::LoggerFragment;
use crate::errors::Result;
use crate::types::{BoxFuture, LogLevel};

pub const KIND: &str = "logger";

/// Emits the resolved `message` template as a log record.
///
/// ```yaml
/// callbacks:
///   audit:
///     type: logger
///     level: warn
///     message: "{path} was {change}"
/// ```
#[derive(Debug, Clone)]
pub struct LoggerCallback {
    name: String,
    message: String,
    level: LogLevel,
}

impl LoggerCallback {
    pub fn new(name: impl Into<String>, message: impl Into<String>, level: LogLevel) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            level,
        }
    }

    pub fn from_config(name: &str, fragment: &Value) -> Result<Self> {
        let parsed: LoggerFragment =
            serde_yaml::from_value(fragment.clone()).map_err(|e| syntax_error(name, e))?;
        Ok(Self::new(name, parsed.message, parsed.level))
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    fn emit(&self, task: &str, attrs: &Attributes) -> Result<CallbackOutcome> {
        let message = resolve(&self.message, attrs)?;
        let callback = self.name.as_str();

        match self.level {
            LogLevel::Error => error!(task = %task, callback = %callback, "{message}"),
            LogLevel::Warn => warn!(task = %task, callback = %callback, "{message}"),
            LogLevel::Info => info!(task = %task, callback = %callback, "{message}"),
            LogLevel::Debug => debug!(task = %task, callback = %callback, "{message}"),
            LogLevel::Trace => trace!(task = %task, callback = %callback, "{message}"),
        }

        Ok(CallbackOutcome::Logged(message))
    }
}

impl Callback for LoggerCallback {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        KIND
    }

    fn invoke<'a>(
        &'a self,
        task: &'a str,
        attrs: &'a Attributes,
    ) -> BoxFuture<'a, Result<CallbackOutcome>> {
        Box::pin(async move { self.emit(task, attrs) })
    }
}
