use std::sync::Mutex;

use tokio::sync::watch;
use watchhook::errors::Result;
use watchhook::exec::{CommandOutput, CommandRunner};
use watchhook::types::BoxFuture;

/// A command runner that:
/// - records every resolved command line it is asked to run
/// - returns a canned [`CommandOutput`] instead of spawning a process
/// - optionally never completes, to simulate a long-running command
#[derive(Debug)]
pub struct RecordingCommandRunner {
    calls: Mutex<Vec<String>>,
    output: CommandOutput,
    hang: bool,
    count: watch::Sender<usize>,
}

impl RecordingCommandRunner {
    pub fn new() -> Self {
        Self::with_output(CommandOutput::default())
    }

    /// Every call returns `output`.
    pub fn with_output(output: CommandOutput) -> Self {
        let (count, _) = watch::channel(0);
        Self {
            calls: Mutex::new(Vec::new()),
            output,
            hang: false,
            count,
        }
    }

    /// Calls are recorded but never complete.
    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Wait until at least `n` calls were recorded, then return them all.
    pub async fn wait_for_calls(&self, n: usize) -> Vec<String> {
        let mut rx = self.count.subscribe();
        rx.wait_for(|count| *count >= n)
            .await
            .expect("runner dropped while waiting");
        self.calls()
    }
}

impl Default for RecordingCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for RecordingCommandRunner {
    fn run<'a>(&'a self, command_line: &'a str) -> BoxFuture<'a, Result<CommandOutput>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(command_line.to_string());
            self.count.send_modify(|count| *count += 1);

            if self.hang {
                std::future::pending::<()>().await;
            }
            Ok(self.output.clone())
        })
    }
}
