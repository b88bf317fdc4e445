// src/engine/runner.rs

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::{Id, JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::errors::{Result, WatchhookError};
use crate::tasks::TaskList;
use crate::watch::WatchService;

use super::signals::{TerminationSignal, TerminationSignals};
use super::{RunReport, RunnerState, ShutdownCause, UnitId};

type UnitSet = JoinSet<Result<()>>;

/// Runner behaviour switches.
#[derive(Debug, Clone, Copy)]
pub struct RunnerOptions {
    /// Install SIGHUP/SIGTERM/SIGINT listeners. Tests turn this off and use
    /// a [`ShutdownHandle`] instead.
    pub handle_signals: bool,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            handle_signals: true,
        }
    }
}

/// Requests a drain exactly as if the signal had been delivered to the
/// process.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: mpsc::UnboundedSender<TerminationSignal>,
}

impl ShutdownHandle {
    /// Returns `false` if the runner is already gone.
    pub fn request(&self, signal: TerminationSignal) -> bool {
        self.tx.send(signal).is_ok()
    }
}

/// Drives every (task, callback) execution unit until shutdown.
///
/// The task list is read-only for the whole run; the only state written
/// while draining is the local [`RunReport`].
pub struct Runner {
    tasks: TaskList,
    watcher: Arc<dyn WatchService>,
    options: RunnerOptions,
    state_tx: watch::Sender<RunnerState>,
    shutdown_tx: mpsc::UnboundedSender<TerminationSignal>,
    shutdown_rx: mpsc::UnboundedReceiver<TerminationSignal>,
}

impl fmt::Debug for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("tasks", &self.tasks.len())
            .field("state", &*self.state_tx.borrow())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Runner {
    pub fn new(tasks: TaskList, watcher: Arc<dyn WatchService>, options: RunnerOptions) -> Self {
        let (state_tx, _) = watch::channel(RunnerState::Idle);
        let (shutdown_tx, shutdown_rx) = mpsc::unbounded_channel();
        Self {
            tasks,
            watcher,
            options,
            state_tx,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Subscribe to lifecycle state changes.
    pub fn state(&self) -> watch::Receiver<RunnerState> {
        self.state_tx.subscribe()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: self.shutdown_tx.clone(),
        }
    }

    /// Run until a termination signal or an unexpected unit failure; then
    /// drain and stop.
    ///
    /// Only setup failures (signal registration) are returned as `Err`;
    /// everything that happens to the units ends up in the [`RunReport`].
    pub async fn run(mut self) -> Result<RunReport> {
        let signal_forwarder = if self.options.handle_signals {
            let mut signals = TerminationSignals::register()?;
            let tx = self.shutdown_tx.clone();
            Some(tokio::spawn(async move {
                loop {
                    let signal = signals.recv().await;
                    if tx.send(signal).is_err() {
                        break;
                    }
                }
            }))
        } else {
            None
        };

        let root = CancellationToken::new();
        let mut units = UnitSet::new();
        let ids = self.spawn_units(&mut units, &root);

        self.set_state(RunnerState::Running);
        info!(units = ids.len(), "task runner started");

        let cause = self.supervise(&mut units, &ids).await;

        self.set_state(RunnerState::Draining);
        let mut report = RunReport::new(cause);
        root.cancel();
        drain(&mut units, &ids, &mut report).await;

        if let Some(forwarder) = signal_forwarder {
            forwarder.abort();
        }

        self.set_state(RunnerState::Stopped);
        info!(
            cancelled = report.cancelled,
            suppressed = report.suppressed,
            unexpected = report.unexpected.len(),
            "task runner stopped"
        );
        Ok(report)
    }

    fn set_state(&self, state: RunnerState) {
        debug!(?state, "runner state");
        self.state_tx.send_replace(state);
    }

    /// Spawn one unit per (task, callback) pair, each on a child token of
    /// `root`.
    fn spawn_units(&self, units: &mut UnitSet, root: &CancellationToken) -> HashMap<Id, UnitId> {
        let mut ids = HashMap::new();

        for task in self.tasks.iter().filter(|t| t.callbacks().is_empty()) {
            warn!(task = %task.name(), "task has no callbacks bound; nothing to run");
        }

        for (task, callback) in self.tasks.units() {
            let unit = UnitId {
                task: task.name().to_string(),
                callback: callback.name().to_string(),
            };

            let task = Arc::clone(task);
            let callback = Arc::clone(callback);
            let watcher = Arc::clone(&self.watcher);
            let token = root.child_token();

            let handle = units.spawn(async move {
                task.run(std::slice::from_ref(&callback), watcher.as_ref(), token)
                    .await
            });

            debug!(unit = %unit, "execution unit spawned");
            ids.insert(handle.id(), unit);
        }

        ids
    }

    /// Steady state. Returns as soon as there is a reason to drain.
    ///
    /// Units finishing on their own never stop the runner; only a
    /// termination signal or an unexpected unit failure does.
    async fn supervise(&mut self, units: &mut UnitSet, ids: &HashMap<Id, UnitId>) -> ShutdownCause {
        if units.is_empty() {
            warn!("no execution units to run; waiting for termination signal");
        }

        loop {
            tokio::select! {
                Some(signal) = self.shutdown_rx.recv() => {
                    info!(signal = %signal, "received termination signal; cancelling tasks");
                    return ShutdownCause::Signal(signal);
                }
                Some(joined) = units.join_next_with_id(), if !units.is_empty() => {
                    let (unit, result) = unit_result(joined, ids);
                    match result {
                        Ok(()) => info!(unit = %unit, "execution unit finished"),
                        Err(err) if err.is_cancellation() => {
                            debug!(unit = %unit, "execution unit cancelled");
                        }
                        Err(err) => {
                            error!(
                                unit = %unit,
                                error = %err,
                                "unexpected error in execution unit; shutting down"
                            );
                            return ShutdownCause::UnitFailure {
                                unit,
                                error: err.to_string(),
                            };
                        }
                    }

                    if units.is_empty() {
                        warn!("all execution units finished; waiting for termination signal");
                    }
                }
            }
        }
    }
}

/// Join every remaining unit after cancellation, sorting results into the
/// report.
async fn drain(units: &mut UnitSet, ids: &HashMap<Id, UnitId>, report: &mut RunReport) {
    while let Some(joined) = units.join_next_with_id().await {
        let (unit, result) = unit_result(joined, ids);
        match result {
            Ok(()) => debug!(unit = %unit, "execution unit finished during drain"),
            Err(err) if err.is_cancellation() => report.cancelled += 1,
            Err(err) if err.is_drain_artifact() => {
                debug!(unit = %unit, error = %err, "ignoring watch backend error during drain");
                report.suppressed += 1;
            }
            Err(err) => {
                error!(unit = %unit, error = %err, "unexpected error while cancelling tasks");
                report.unexpected.push((unit, err));
            }
        }
    }
}

fn unit_result(
    joined: std::result::Result<(Id, Result<()>), JoinError>,
    ids: &HashMap<Id, UnitId>,
) -> (UnitId, Result<()>) {
    match joined {
        Ok((id, result)) => (lookup(ids, id), result),
        Err(join_err) => {
            let unit = lookup(ids, join_err.id());
            let err = if join_err.is_cancelled() {
                WatchhookError::Cancelled
            } else {
                WatchhookError::Other(anyhow::anyhow!("execution unit panicked: {join_err}"))
            };
            (unit, Err(err))
        }
    }
}

fn lookup(ids: &HashMap<Id, UnitId>, id: Id) -> UnitId {
    ids.get(&id).cloned().unwrap_or_else(|| UnitId {
        task: "<unknown>".to_string(),
        callback: "<unknown>".to_string(),
    })
}
