use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tokio::sync::{mpsc, watch};
use watchhook::errors::{Result, WatchhookError};
use watchhook::types::{BoxFuture, Change, ChangeBatch};
use watchhook::watch::{ChangeStream, WatchService};

type BatchTx = mpsc::UnboundedSender<Result<ChangeBatch>>;

/// A watch service driven by the test instead of the filesystem.
///
/// Every `subscribe` opens a channel; [`emit`](Self::emit) delivers a batch
/// to each subscription that watches a prefix of one of the batch's paths.
#[derive(Debug)]
pub struct ScriptedWatchService {
    subscriptions: Mutex<Vec<(Vec<PathBuf>, BatchTx)>>,
    missing: Vec<PathBuf>,
    subscribed: watch::Sender<usize>,
}

impl ScriptedWatchService {
    pub fn new() -> Self {
        let (subscribed, _) = watch::channel(0);
        Self {
            subscriptions: Mutex::new(Vec::new()),
            missing: Vec::new(),
            subscribed,
        }
    }

    /// Subscribing to `path` fails with `PathNotFound`.
    pub fn with_missing_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.missing.push(path.into());
        self
    }

    pub fn subscriber_count(&self) -> usize {
        *self.subscribed.borrow()
    }

    /// Wait until at least `n` subscriptions were opened.
    pub async fn wait_for_subscribers(&self, n: usize) {
        let mut rx = self.subscribed.subscribe();
        rx.wait_for(|count| *count >= n)
            .await
            .expect("watch service dropped while waiting");
    }

    /// Deliver `changes` as one batch. Returns how many subscriptions got it.
    pub fn emit(&self, changes: impl IntoIterator<Item = Change>) -> usize {
        let batch: ChangeBatch = changes.into_iter().collect();
        let subs = self.subscriptions.lock().unwrap();
        let mut delivered = 0;
        for (paths, tx) in subs.iter() {
            if !batch.iter().any(|c| watches(paths, &c.path)) {
                continue;
            }
            if tx.send(Ok(batch.clone())).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Fail every open subscription with the error built by `make`.
    pub fn fail_all(&self, make: impl Fn() -> WatchhookError) {
        let subs = self.subscriptions.lock().unwrap();
        for (_, tx) in subs.iter() {
            let _ = tx.send(Err(make()));
        }
    }

    /// End every open subscription.
    pub fn close_all(&self) {
        self.subscriptions.lock().unwrap().clear();
    }
}

impl Default for ScriptedWatchService {
    fn default() -> Self {
        Self::new()
    }
}

impl WatchService for ScriptedWatchService {
    fn subscribe(&self, paths: &[PathBuf]) -> Result<Box<dyn ChangeStream>> {
        if let Some(missing) = paths.iter().find(|p| self.missing.contains(p)) {
            return Err(WatchhookError::PathNotFound(missing.clone()));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        self.subscriptions
            .lock()
            .unwrap()
            .push((paths.to_vec(), tx));
        self.subscribed.send_modify(|count| *count += 1);

        Ok(Box::new(ScriptedStream { rx }))
    }
}

struct ScriptedStream {
    rx: mpsc::UnboundedReceiver<Result<ChangeBatch>>,
}

impl ChangeStream for ScriptedStream {
    fn next_batch(&mut self) -> BoxFuture<'_, Option<Result<ChangeBatch>>> {
        Box::pin(self.rx.recv())
    }
}

fn watches(paths: &[PathBuf], changed: &Path) -> bool {
    paths.iter().any(|p| changed.starts_with(p))
}
