// src/exec/backend.rs

//! Pluggable command runner abstraction.
//!
//! - `ShellCommandRunner` is the default implementation used by `watchhook`.
//!   It runs the command line through the platform shell.
//! - Tests can provide their own `CommandRunner` that, for example, records
//!   which command lines were requested and returns canned output.

use std::fmt;

use crate::errors::Result;
use crate::types::BoxFuture;

use super::command::run_shell;

/// Captured result of one command execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Exit code, `-1` when the process was terminated by a signal.
    pub status: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }

    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Trait abstracting how a resolved command line is executed.
///
/// Production code uses [`ShellCommandRunner`]; tests can provide their own
/// implementation that doesn't spawn real processes.
pub trait CommandRunner: Send + Sync + fmt::Debug {
    /// Run `command_line` to completion and capture its output.
    ///
    /// Dropping the returned future must stop the underlying process.
    fn run<'a>(&'a self, command_line: &'a str) -> BoxFuture<'a, Result<CommandOutput>>;
}

/// Real command runner used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellCommandRunner;

impl CommandRunner for ShellCommandRunner {
    fn run<'a>(&'a self, command_line: &'a str) -> BoxFuture<'a, Result<CommandOutput>> {
        Box::pin(run_shell(command_line))
    }
}
