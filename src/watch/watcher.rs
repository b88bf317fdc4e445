// src/watch/watcher.rs

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::time::{timeout, Instant};
use tracing::{debug, info};

use crate::errors::{Result, WatchhookError};
use crate::types::{BoxFuture, ChangeBatch};
use crate::watch::events::changes_from_event;
use crate::watch::service::{ChangeStream, WatchService};

/// Quiet period that closes a batch: events arriving closer together than
/// this are grouped.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

/// Upper bound on how long a busy directory can keep one batch open.
const MAX_BATCH_WINDOW: Duration = Duration::from_millis(1600);

/// Watch service backed by `notify`'s recommended platform watcher.
///
/// Directories are watched recursively, files non-recursively.
#[derive(Debug, Clone)]
pub struct NotifyWatchService {
    debounce: Duration,
}

impl NotifyWatchService {
    pub fn new(debounce: Duration) -> Self {
        Self { debounce }
    }
}

impl Default for NotifyWatchService {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl WatchService for NotifyWatchService {
    fn subscribe(&self, paths: &[PathBuf]) -> Result<Box<dyn ChangeStream>> {
        if let Some(missing) = paths.iter().find(|p| !p.exists()) {
            return Err(WatchhookError::PathNotFound(missing.clone()));
        }

        // Channel from the blocking notify callback into the async world.
        let (event_tx, event_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                // A closed channel means the subscription was dropped.
                let _ = event_tx.send(res);
            },
            Config::default(),
        )
        .map_err(classify)?;

        for path in paths {
            let mode = if path.is_dir() {
                RecursiveMode::Recursive
            } else {
                RecursiveMode::NonRecursive
            };
            watcher.watch(path, mode).map_err(classify)?;
        }

        info!(?paths, "file watcher started");

        Ok(Box::new(NotifyStream {
            _watcher: watcher,
            event_rx,
            debounce: self.debounce,
        }))
    }
}

/// Live subscription. Dropping it stops the underlying watcher.
struct NotifyStream {
    _watcher: RecommendedWatcher,
    event_rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
    debounce: Duration,
}

impl NotifyStream {
    async fn collect_batch(&mut self) -> Option<Result<ChangeBatch>> {
        loop {
            let first = self.event_rx.recv().await?;
            let mut batch = ChangeBatch::new();
            match first {
                Ok(event) => batch.extend(changes_from_event(&event)),
                Err(err) => return Some(Err(classify(err))),
            }

            // Gather the rest of the burst.
            let deadline = Instant::now() + MAX_BATCH_WINDOW;
            while Instant::now() < deadline {
                match timeout(self.debounce, self.event_rx.recv()).await {
                    Ok(Some(Ok(event))) => batch.extend(changes_from_event(&event)),
                    Ok(Some(Err(err))) => return Some(Err(classify(err))),
                    Ok(None) | Err(_) => break,
                }
            }

            if batch.is_empty() {
                // Only access/unclassified events in this burst.
                continue;
            }

            debug!(changes = batch.len(), "change batch ready");
            return Some(Ok(batch));
        }
    }
}

impl ChangeStream for NotifyStream {
    fn next_batch(&mut self) -> BoxFuture<'_, Option<Result<ChangeBatch>>> {
        Box::pin(self.collect_batch())
    }
}

/// Translate backend errors into crate errors.
///
/// A busy event source shows up when a subscription is torn down while its
/// reader is still parked on it; the runner filters that case during drain.
fn classify(err: notify::Error) -> WatchhookError {
    match &err.kind {
        notify::ErrorKind::Io(io_err) if io_err.kind() == io::ErrorKind::ResourceBusy => {
            WatchhookError::WatchAlreadyAcquired(err.to_string())
        }
        notify::ErrorKind::PathNotFound => match err.paths.first() {
            Some(path) => WatchhookError::PathNotFound(path.clone()),
            None => WatchhookError::Watch(err),
        },
        _ => WatchhookError::Watch(err),
    }
}
