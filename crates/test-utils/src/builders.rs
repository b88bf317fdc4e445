#![allow(dead_code)]

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

/// Builder for a whole config document.
pub struct ConfigBuilder {
    root: Mapping,
    callbacks: Mapping,
    tasks: Mapping,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            root: Mapping::new(),
            callbacks: Mapping::new(),
            tasks: Mapping::new(),
        }
    }

    pub fn with_shell(self, name: &str, command: &str) -> Self {
        self.with_callback(name, shell(command))
    }

    pub fn with_logger(self, name: &str, message: &str) -> Self {
        self.with_callback(name, logger(message, None))
    }

    pub fn with_callback(mut self, name: &str, fragment: Value) -> Self {
        self.callbacks.insert(name.into(), fragment);
        self
    }

    pub fn with_task(mut self, name: &str, task: WatchTaskBuilder) -> Self {
        self.tasks.insert(name.into(), task.build());
        self
    }

    pub fn with_raw_task(mut self, name: &str, fragment: Value) -> Self {
        self.tasks.insert(name.into(), fragment);
        self
    }

    /// Any other top-level section, e.g. `log_stderr`.
    pub fn with_section(mut self, key: &str, value: Value) -> Self {
        self.root.insert(key.into(), value);
        self
    }

    pub fn build(self) -> Value {
        let mut root = self.root;
        root.insert("callbacks".into(), Value::Mapping(self.callbacks));
        root.insert("tasks".into(), Value::Mapping(self.tasks));
        Value::Mapping(root)
    }

    pub fn to_yaml(self) -> String {
        serde_yaml::to_string(&self.build()).expect("document serializes")
    }

    /// Write the document to `dir/watchhook.yaml` and return its path.
    pub fn write_to(self, dir: &Path) -> PathBuf {
        let path = dir.join("watchhook.yaml");
        std::fs::write(&path, self.to_yaml()).expect("write config");
        path
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for one `watchfiles` task fragment.
pub struct WatchTaskBuilder {
    changes: Vec<Value>,
    paths: Vec<Value>,
    attrs: Mapping,
    callbacks: Vec<Value>,
}

impl WatchTaskBuilder {
    pub fn new() -> Self {
        Self {
            changes: Vec::new(),
            paths: Vec::new(),
            attrs: Mapping::new(),
            callbacks: Vec::new(),
        }
    }

    pub fn change(mut self, kind: &str) -> Self {
        self.changes.push(kind.into());
        self
    }

    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.paths
            .push(path.as_ref().to_string_lossy().into_owned().into());
        self
    }

    pub fn attr(mut self, key: &str, value: &str) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn callback(mut self, name: &str) -> Self {
        self.callbacks.push(name.into());
        self
    }

    pub fn build(self) -> Value {
        let mut m = Mapping::new();
        m.insert("type".into(), "watchfiles".into());
        m.insert("changes".into(), Value::Sequence(self.changes));
        m.insert("paths".into(), Value::Sequence(self.paths));
        if !self.attrs.is_empty() {
            m.insert("attrs".into(), Value::Mapping(self.attrs));
        }
        m.insert("callbacks".into(), Value::Sequence(self.callbacks));
        Value::Mapping(m)
    }
}

impl Default for WatchTaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `{type: shell, command: ...}`
pub fn shell(command: &str) -> Value {
    let mut m = Mapping::new();
    m.insert("type".into(), "shell".into());
    m.insert("command".into(), command.into());
    Value::Mapping(m)
}

/// `{type: logger, message: ..., level: ...}`
pub fn logger(message: &str, level: Option<&str>) -> Value {
    let mut m = Mapping::new();
    m.insert("type".into(), "logger".into());
    m.insert("message".into(), message.into());
    if let Some(level) = level {
        m.insert("level".into(), level.into());
    }
    Value::Mapping(m)
}
