// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - The [`WatchService`] / [`ChangeStream`] seam tasks subscribe through.
//! - Wiring up a cross-platform filesystem watcher (`notify`) behind it.
//! - Translating raw `notify` events into `added` / `modified` / `deleted`
//!   changes.
//!
//! It does **not** know about tasks or callbacks; a subscription only turns
//! filesystem activity under a set of paths into change batches.

pub mod events;
pub mod service;
pub mod watcher;

pub use events::changes_from_event;
pub use service::{ChangeStream, WatchService};
pub use watcher::{NotifyWatchService, DEFAULT_DEBOUNCE};
