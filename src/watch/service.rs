// src/watch/service.rs

use std::fmt;
use std::path::PathBuf;

use crate::errors::Result;
use crate::types::{BoxFuture, ChangeBatch};

/// An infinite, non-restartable sequence of change batches.
pub trait ChangeStream: Send {
    /// Wait for the next batch.
    ///
    /// - `None`: the subscription ended and will never yield again.
    /// - `Some(Err(_))`: the backend failed.
    ///
    /// Must be cancel-safe with respect to `tokio::select!`: dropping the
    /// future between batches loses nothing that was already delivered.
    fn next_batch(&mut self) -> BoxFuture<'_, Option<Result<ChangeBatch>>>;
}

/// Produces change subscriptions for a set of paths.
///
/// Production code uses [`super::NotifyWatchService`]; tests can provide an
/// implementation that emits scripted batches.
pub trait WatchService: Send + Sync + fmt::Debug {
    /// Start watching `paths`.
    ///
    /// Fails with `PathNotFound` if any path does not exist at subscribe
    /// time.
    fn subscribe(&self, paths: &[PathBuf]) -> Result<Box<dyn ChangeStream>>;
}
