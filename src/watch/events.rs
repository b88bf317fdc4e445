// src/watch/events.rs

//! Translation of raw `notify` events into [`Change`]s.

use notify::event::{EventKind, ModifyKind, RenameMode};
use notify::Event;

use crate::types::{Change, ChangeKind};

/// Map one `notify` event onto zero or more changes.
///
/// - create -> `added`, remove -> `deleted`, content/metadata -> `modified`
/// - rename source -> `deleted`, rename target -> `added`
/// - access and unclassified events are dropped
pub fn changes_from_event(event: &Event) -> Vec<Change> {
    let all = |kind: ChangeKind| -> Vec<Change> {
        event
            .paths
            .iter()
            .map(|p| Change::new(kind, p.clone()))
            .collect()
    };

    match &event.kind {
        EventKind::Create(_) => all(ChangeKind::Added),
        EventKind::Remove(_) => all(ChangeKind::Deleted),
        EventKind::Modify(ModifyKind::Name(mode)) => match mode {
            RenameMode::From => all(ChangeKind::Deleted),
            RenameMode::To => all(ChangeKind::Added),
            RenameMode::Both => {
                let mut changes = Vec::with_capacity(event.paths.len());
                let mut paths = event.paths.iter();
                if let Some(from) = paths.next() {
                    changes.push(Change::new(ChangeKind::Deleted, from.clone()));
                }
                changes.extend(paths.map(|to| Change::new(ChangeKind::Added, to.clone())));
                changes
            }
            // Backend could not tell which side of the rename this is.
            _ => event
                .paths
                .iter()
                .map(|p| {
                    let kind = if p.exists() {
                        ChangeKind::Added
                    } else {
                        ChangeKind::Deleted
                    };
                    Change::new(kind, p.clone())
                })
                .collect(),
        },
        EventKind::Modify(_) => all(ChangeKind::Modified),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => Vec::new(),
    }
}
