// src/tasks/mod.rs

//! Watch definitions that produce events for their callbacks.
//!
//! Every task implements [`Task`]. Concrete variants are selected by the
//! `type` field of their config fragment; `watchfiles` ([`WatchTask`]) is
//! the only one today.

pub mod list;
pub mod watch;

use std::fmt;
use std::sync::Arc;

use serde_yaml::Value;
use tokio_util::sync::CancellationToken;

use crate::callbacks::Callback;
use crate::errors::{Result, WatchhookError};
use crate::types::BoxFuture;
use crate::watch::WatchService;

pub use list::TaskList;
pub use watch::WatchTask;

/// A watch definition bound to callbacks.
pub trait Task: Send + Sync + fmt::Debug {
    /// Unique name from the `tasks` section.
    fn name(&self) -> &str;

    /// The `type` discriminator this task was built from.
    fn kind(&self) -> &'static str;

    /// Callbacks bound to this task, in config order.
    fn callbacks(&self) -> &[Arc<dyn Callback>];

    /// Main loop: watch and invoke `callbacks` (sequentially, in order) for
    /// every matching event until the subscription ends, an unrecoverable
    /// error occurs, or `cancel` fires.
    ///
    /// Returns `Err(WatchhookError::Cancelled)` when cancelled.
    fn run<'a>(
        &'a self,
        callbacks: &'a [Arc<dyn Callback>],
        watcher: &'a dyn WatchService,
        cancel: CancellationToken,
    ) -> BoxFuture<'a, Result<()>>;
}

/// Build a task from its config fragment, dispatching on `type`.
///
/// `callbacks` are the already-resolved callbacks the task is bound to.
pub fn task_from_config(
    name: &str,
    fragment: &Value,
    callbacks: Vec<Arc<dyn Callback>>,
) -> Result<Arc<dyn Task>> {
    let variant = match fragment.get("type") {
        Some(Value::String(s)) => s.as_str(),
        Some(_) => return Err(syntax(name, "field `type` must be a string")),
        None => return Err(syntax(name, "missing field `type`")),
    };

    match variant {
        watch::KIND => Ok(Arc::new(WatchTask::from_config(name, fragment, callbacks)?)),
        other => Err(WatchhookError::UnsupportedVariant {
            entity: "task",
            name: name.to_string(),
            variant: other.to_string(),
        }),
    }
}

pub(crate) fn syntax(name: &str, reason: impl Into<String>) -> WatchhookError {
    WatchhookError::TaskSyntax {
        name: name.to_string(),
        reason: reason.into(),
    }
}
