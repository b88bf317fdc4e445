// src/tasks/list.rs

use std::sync::Arc;

use crate::callbacks::Callback;
use crate::tasks::Task;

/// Ordered collection of tasks.
///
/// Order does not affect execution (every task runs independently); it only
/// makes iteration deterministic.
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    tasks: Vec<Arc<dyn Task>>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Task>> {
        self.tasks.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Task>> {
        self.tasks.iter().find(|t| t.name() == name)
    }

    /// Every (task, callback) pair, i.e. every execution unit to spawn.
    pub fn units(&self) -> impl Iterator<Item = (&Arc<dyn Task>, &Arc<dyn Callback>)> {
        self.tasks
            .iter()
            .flat_map(|task| task.callbacks().iter().map(move |cb| (task, cb)))
    }
}

impl FromIterator<Arc<dyn Task>> for TaskList {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Task>>>(iter: I) -> Self {
        Self {
            tasks: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Arc<dyn Task>;
    type IntoIter = std::slice::Iter<'a, Arc<dyn Task>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
