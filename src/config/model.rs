// src/config/model.rs

//! Typed views over the fragments of a YAML config document.
//!
//! The document itself stays a generic `serde_yaml::Value` until the
//! compiler has checked its structure; each entry is then deserialized into
//! one of these structs. Unknown keys (such as `type`) are ignored here and
//! dispatched on by the compiler.
//!
//! ```yaml
//! log_stderr:
//!   level: info
//! log_journal:
//! log_file:
//!   path: /tmp/watchhook.log
//!
//! callbacks:
//!   copy:
//!     type: shell
//!     command: cp {path} {dest}
//!
//! tasks:
//!   incoming:
//!     type: watchfiles
//!     changes: [added]
//!     paths: [/srv/incoming]
//!     attrs:
//!       dest: /srv/archive
//!     callbacks: [copy]
//! ```

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::LogLevel;

/// `callbacks.<name>` with `type: shell`.
#[derive(Debug, Clone, Deserialize)]
pub struct ShellFragment {
    /// Command template; `{key}` placeholders are filled from attributes.
    pub command: String,
}

/// `callbacks.<name>` with `type: logger`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggerFragment {
    /// Message template.
    pub message: String,

    #[serde(default)]
    pub level: LogLevel,
}

/// `tasks.<name>` with `type: watchfiles`.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchTaskFragment {
    /// Change kind tokens: `added`, `modified`, `deleted`.
    pub changes: Vec<String>,

    /// Files or directories to watch.
    pub paths: Vec<String>,

    /// Static attributes available to every callback invocation.
    #[serde(default)]
    pub attrs: Option<serde_yaml::Mapping>,
}

/// The part of every task fragment the compiler reads itself.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskBindings {
    /// Names of callbacks from the `callbacks` section.
    pub callbacks: Vec<String>,
}

/// `log_stderr` section. Present-but-empty enables it at the default level.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogStderrSection {
    #[serde(default)]
    pub level: Option<LogLevel>,
}

/// `log_file` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LogFileSection {
    pub path: PathBuf,

    #[serde(default)]
    pub level: Option<LogLevel>,
}

/// `log_journal` section (systemd journal, Linux only). Present-but-empty
/// enables it at the default level.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogJournalSection {
    #[serde(default)]
    pub level: Option<LogLevel>,
}

/// Logging sinks requested by the config.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub stderr: Option<LogStderrSection>,
    pub journal: Option<LogJournalSection>,
    pub file: Option<LogFileSection>,
}

impl LoggingConfig {
    /// Number of sinks the config asks for.
    pub fn sink_count(&self) -> usize {
        [
            self.stderr.is_some(),
            self.journal.is_some(),
            self.file.is_some(),
        ]
        .into_iter()
        .filter(|on| *on)
        .count()
    }
}
