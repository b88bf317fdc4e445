// src/callbacks/registry.rs

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::callbacks::Callback;

/// Name -> callback mapping, built once per config load.
#[derive(Debug, Clone, Default)]
pub struct CallbackRegistry {
    callbacks: BTreeMap<String, Arc<dyn Callback>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Callback>> {
        self.callbacks.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.callbacks.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.callbacks.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Callback>)> {
        self.callbacks.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Look up every name in order; unknown names are returned separately.
    pub fn resolve_names<'n>(
        &self,
        names: &'n [String],
    ) -> (Vec<Arc<dyn Callback>>, Vec<&'n str>) {
        let mut found = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names {
            match self.callbacks.get(name) {
                Some(cb) => found.push(Arc::clone(cb)),
                None => missing.push(name.as_str()),
            }
        }
        (found, missing)
    }
}

impl FromIterator<Arc<dyn Callback>> for CallbackRegistry {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Callback>>>(iter: I) -> Self {
        let callbacks = iter
            .into_iter()
            .map(|cb| (cb.name().to_string(), cb))
            .collect();
        Self { callbacks }
    }
}
