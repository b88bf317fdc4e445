// src/exec/command.rs

use std::process::Stdio;

use anyhow::Context;
use tokio::process::Command;
use tracing::debug;

use crate::errors::Result;
use crate::exec::backend::CommandOutput;

/// Run a command line through the platform shell and capture its output.
///
/// The child is spawned with `kill_on_drop(true)`: if the caller stops
/// awaiting (e.g. the execution unit is cancelled), the process is killed.
pub async fn run_shell(command_line: &str) -> Result<CommandOutput> {
    // Build a shell command appropriate for the platform.
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command_line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command_line);
        c
    };

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(cmd = %command_line, "spawning shell process");

    let output = cmd
        .output()
        .await
        .with_context(|| format!("running shell command '{command_line}'"))?;

    let status = output.status.code().unwrap_or(-1);
    debug!(cmd = %command_line, exit_code = status, "shell process exited");

    Ok(CommandOutput {
        stdout: output.stdout,
        stderr: output.stderr,
        status,
    })
}
