#![allow(dead_code)]

pub use watchhook_test_utils::builders;
pub use watchhook_test_utils::recording_runner::RecordingCommandRunner;
pub use watchhook_test_utils::scripted_watch::ScriptedWatchService;
pub use watchhook_test_utils::{init_tracing, with_timeout};

use std::path::PathBuf;
use std::sync::Arc;

use watchhook::attrs::Attributes;
use watchhook::callbacks::{Callback, ShellCallback};
use watchhook::exec::CommandRunner;
use watchhook::tasks::{Task, TaskList, WatchTask};
use watchhook::types::ChangeKind;

/// A shell callback whose command lines end up in `runner`.
pub fn shell_callback(
    name: &str,
    command: &str,
    runner: &Arc<RecordingCommandRunner>,
) -> Arc<dyn Callback> {
    let runner: Arc<dyn CommandRunner> = runner.clone();
    Arc::new(ShellCallback::new(name, command, runner))
}

/// A `watchfiles` task on `paths`, interested in `changes`.
pub fn watch_task(
    name: &str,
    changes: &[ChangeKind],
    paths: &[&str],
    callbacks: Vec<Arc<dyn Callback>>,
) -> Arc<dyn Task> {
    let paths = paths.iter().map(PathBuf::from).collect();
    Arc::new(
        WatchTask::new(
            name,
            changes.iter().copied(),
            paths,
            Attributes::new(),
            callbacks,
        )
        .expect("valid task"),
    )
}

pub fn task_list(tasks: impl IntoIterator<Item = Arc<dyn Task>>) -> TaskList {
    tasks.into_iter().collect()
}
