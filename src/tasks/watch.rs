// src/tasks/watch.rs

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use serde_yaml::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::attrs::{event_attributes, merge, Attributes};
use crate::callbacks::Callback;
use crate::config::model::WatchTaskFragment;
use crate::errors::{Result, WatchhookError};
use crate::tasks::{syntax, Task};
use crate::types::{BoxFuture, ChangeKind};
use crate::watch::WatchService;

pub const KIND: &str = "watchfiles";

/// Watches a set of paths and reacts to selected change kinds.
///
/// ```yaml
/// tasks:
///   incoming:
///     type: watchfiles
///     changes: [added]
///     paths: [/srv/incoming]
///     attrs:
///       dest: /srv/archive
///     callbacks: [copy]
/// ```
#[derive(Debug)]
pub struct WatchTask {
    name: String,
    changes: BTreeSet<ChangeKind>,
    paths: Vec<PathBuf>,
    attrs: Attributes,
    callbacks: Vec<Arc<dyn Callback>>,
}

impl WatchTask {
    /// Build a task, enforcing the non-empty `changes` and `paths`
    /// invariants.
    pub fn new(
        name: impl Into<String>,
        changes: impl IntoIterator<Item = ChangeKind>,
        paths: Vec<PathBuf>,
        attrs: Attributes,
        callbacks: Vec<Arc<dyn Callback>>,
    ) -> Result<Self> {
        let name = name.into();
        let changes: BTreeSet<ChangeKind> = changes.into_iter().collect();
        if changes.is_empty() {
            return Err(syntax(&name, "`changes` must not be empty"));
        }
        if paths.is_empty() {
            return Err(syntax(&name, "`paths` must not be empty"));
        }
        Ok(Self {
            name,
            changes,
            paths,
            attrs,
            callbacks,
        })
    }

    pub fn from_config(
        name: &str,
        fragment: &Value,
        callbacks: Vec<Arc<dyn Callback>>,
    ) -> Result<Self> {
        debug!(task = %name, "building task from config");

        let parsed: WatchTaskFragment = serde_yaml::from_value(fragment.clone())
            .map_err(|e| syntax(name, e.to_string()))?;

        let changes = parsed
            .changes
            .iter()
            .map(|token| token.parse::<ChangeKind>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|reason| syntax(name, reason))?;

        let paths = parsed.paths.into_iter().map(PathBuf::from).collect();

        let attrs = match parsed.attrs {
            Some(mapping) => attrs_from_mapping(name, &mapping)?,
            None => Attributes::new(),
        };

        Self::new(name, changes, paths, attrs, callbacks)
    }

    pub fn changes(&self) -> &BTreeSet<ChangeKind> {
        &self.changes
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    async fn watch(
        &self,
        callbacks: &[Arc<dyn Callback>],
        watcher: &dyn WatchService,
        cancel: CancellationToken,
    ) -> Result<()> {
        let names: Vec<&str> = callbacks.iter().map(|cb| cb.name()).collect();
        info!(task = %self.name, callbacks = ?names, "task scheduled");

        let mut stream = watcher.subscribe(&self.paths)?;

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(WatchhookError::Cancelled),
                next = stream.next_batch() => next,
            };

            let batch = match next {
                Some(batch) => batch?,
                None => {
                    info!(task = %self.name, "watch subscription ended");
                    return Ok(());
                }
            };

            for change in batch.iter().filter(|c| self.changes.contains(&c.kind)) {
                debug!(task = %self.name, change = %change.kind, path = ?change.path, "matching change");
                let attrs = merge(&self.attrs, &event_attributes(change));

                for callback in callbacks {
                    let outcome = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(WatchhookError::Cancelled),
                        outcome = callback.invoke(&self.name, &attrs) => outcome,
                    };

                    match outcome {
                        Ok(_) => {}
                        Err(err) if err.is_attribute_error() => {
                            error!(
                                task = %self.name,
                                callback = %callback.name(),
                                error = %err,
                                "callback raised attribute error; skipping event"
                            );
                        }
                        Err(err) => return Err(err),
                    }
                }
            }
        }
    }
}

impl Task for WatchTask {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        KIND
    }

    fn callbacks(&self) -> &[Arc<dyn Callback>] {
        &self.callbacks
    }

    fn run<'a>(
        &'a self,
        callbacks: &'a [Arc<dyn Callback>],
        watcher: &'a dyn WatchService,
        cancel: CancellationToken,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.watch(callbacks, watcher, cancel))
    }
}

/// Static attributes accept scalar values; numbers and booleans are kept in
/// their YAML spelling.
fn attrs_from_mapping(name: &str, mapping: &serde_yaml::Mapping) -> Result<Attributes> {
    let mut attrs = Attributes::new();
    for (key, value) in mapping {
        let Value::String(key) = key else {
            return Err(syntax(name, "`attrs` keys must be strings"));
        };
        let value = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => {
                return Err(syntax(
                    name,
                    format!("attribute '{key}' must be a string, number or boolean"),
                ));
            }
        };
        attrs.insert(key.clone(), value);
    }
    Ok(attrs)
}
