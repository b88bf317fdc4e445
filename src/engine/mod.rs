// src/engine/mod.rs

//! Execution engine for watchhook.
//!
//! The [`Runner`] owns the concurrency domain:
//! - one execution unit (a Tokio task) per (task, callback) pair
//! - termination signal handling (SIGHUP, SIGTERM, SIGINT)
//! - broadcast cancellation and the drain barrier
//! - filtering and reporting of errors collected while draining
//!
//! Lifecycle: `Idle -> Running -> Draining -> Stopped`.

use std::fmt;

use crate::errors::WatchhookError;

pub mod runner;
pub mod signals;

pub use runner::{Runner, RunnerOptions, ShutdownHandle};
pub use signals::{TerminationSignal, TerminationSignals};

/// Observable runner lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Idle,
    Running,
    Draining,
    Stopped,
}

/// Identity of one execution unit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitId {
    pub task: String,
    pub callback: String,
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.task, self.callback)
    }
}

/// Why the runner left `Running`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownCause {
    /// A termination signal arrived (or was requested through a
    /// [`ShutdownHandle`]).
    Signal(TerminationSignal),
    /// A unit failed with an unexpected error; shutdown was forced.
    UnitFailure { unit: UnitId, error: String },
}

/// Summary of a completed run.
#[derive(Debug)]
pub struct RunReport {
    pub cause: ShutdownCause,
    /// Units that acknowledged cancellation during drain.
    pub cancelled: usize,
    /// Known watch-backend artifacts swallowed during drain.
    pub suppressed: usize,
    /// Errors collected during drain that were neither of the above.
    pub unexpected: Vec<(UnitId, WatchhookError)>,
}

impl RunReport {
    fn new(cause: ShutdownCause) -> Self {
        Self {
            cause,
            cancelled: 0,
            suppressed: 0,
            unexpected: Vec::new(),
        }
    }

    /// True when the runner stopped without any unexpected failure.
    pub fn is_clean(&self) -> bool {
        !matches!(self.cause, ShutdownCause::UnitFailure { .. }) && self.unexpected.is_empty()
    }
}
