// src/callbacks/shell.rs

use std::sync::Arc;

use serde_yaml::Value;
use tracing::{error, info, warn};

use crate::attrs::{resolve, Attributes};
use crate::callbacks::{syntax_error, Callback, CallbackOutcome};
use crate::config::model::ShellFragment;
use crate::errors::Result;
use crate::exec::CommandRunner;
use crate::types::BoxFuture;

pub const KIND: &str = "shell";

/// Runs a command template through the shell.
///
/// ```yaml
/// callbacks:
///   copy:
///     type: shell
///     command: cp {path} {dest}
/// ```
#[derive(Debug)]
pub struct ShellCallback {
    name: String,
    command: String,
    runner: Arc<dyn CommandRunner>,
}

impl ShellCallback {
    pub fn new(
        name: impl Into<String>,
        command: impl Into<String>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            runner,
        }
    }

    pub fn from_config(name: &str, fragment: &Value, runner: Arc<dyn CommandRunner>) -> Result<Self> {
        let parsed: ShellFragment =
            serde_yaml::from_value(fragment.clone()).map_err(|e| syntax_error(name, e))?;
        Ok(Self::new(name, parsed.command, runner))
    }

    /// The unresolved command template.
    pub fn command(&self) -> &str {
        &self.command
    }

    async fn run(&self, task: &str, attrs: &Attributes) -> Result<CallbackOutcome> {
        let command_line = resolve(&self.command, attrs)?;
        info!(
            task = %task,
            callback = %self.name,
            cmd = %command_line,
            "running shell callback"
        );

        let output = self.runner.run(&command_line).await?;

        if !output.stdout.is_empty() {
            info!(
                task = %task,
                callback = %self.name,
                "callback stdout:\n{}",
                output.stdout_lossy()
            );
        }
        if !output.stderr.is_empty() {
            error!(
                task = %task,
                callback = %self.name,
                "callback stderr:\n{}",
                output.stderr_lossy()
            );
        }
        if !output.success() {
            warn!(
                task = %task,
                callback = %self.name,
                exit_code = output.status,
                "shell callback exited with non-zero status"
            );
        }

        Ok(CallbackOutcome::Command(output))
    }
}

impl Callback for ShellCallback {
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
        Box::pin(self.run(task, attrs))
    }
}
