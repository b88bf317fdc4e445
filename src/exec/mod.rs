// src/exec/mod.rs

//! Command execution layer.
//!
//! Shell callbacks never spawn processes themselves; they talk to a
//! [`CommandRunner`]. This keeps process handling in one place and lets
//! tests swap in a runner that only records command lines.
//!
//! - [`backend`] defines the `CommandRunner` trait, the captured
//!   [`CommandOutput`], and the production [`ShellCommandRunner`].
//! - [`command`] builds and runs the platform shell invocation with
//!   `tokio::process::Command`.

pub mod backend;
pub mod command;

pub use backend::{CommandOutput, CommandRunner, ShellCommandRunner};
pub use command::run_shell;
