// src/config/compile.rs

//! Turn a document tree into the callback/task object graph.
//!
//! Order is fixed: callbacks first, then tasks, because tasks hold shared
//! references to callbacks. Compilation stops at the first failing entity
//! and returns no registry, so nothing is ever partially registered.

use serde_yaml::Value;
use tracing::{info, warn};

use crate::callbacks::{callback_from_config, CallbackContext, CallbackRegistry};
use crate::config::model::{
    LogFileSection, LogJournalSection, LogStderrSection, LoggingConfig, TaskBindings,
};
use crate::config::validate::{require_section, root_mapping, section_entries};
use crate::errors::{Result, WatchhookError};
use crate::tasks::{syntax, task_from_config, TaskList};

/// Everything a config file describes.
#[derive(Debug, Clone)]
pub struct CompiledConfig {
    pub logging: LoggingConfig,
    pub callbacks: CallbackRegistry,
    pub tasks: TaskList,
}

/// Compile logging sinks, callbacks and tasks, in that order.
pub fn compile(doc: &Value, ctx: &CallbackContext) -> Result<CompiledConfig> {
    let logging = compile_logging(doc)?;
    let callbacks = compile_callbacks(doc, ctx)?;
    let tasks = compile_tasks(doc, &callbacks)?;
    Ok(CompiledConfig {
        logging,
        callbacks,
        tasks,
    })
}

/// Build the callback registry from the `callbacks` section.
pub fn compile_callbacks(doc: &Value, ctx: &CallbackContext) -> Result<CallbackRegistry> {
    let section = require_section(doc, "callbacks")?;
    let registry = section_entries(section, "callback")?
        .into_iter()
        .map(|(name, fragment)| callback_from_config(name, fragment, ctx))
        .collect::<Result<CallbackRegistry>>()?;

    info!(count = registry.len(), "callbacks compiled");
    Ok(registry)
}

/// Build the task list from the `tasks` section.
///
/// Callback names that are not in `callbacks` are dropped with a warning
/// instead of failing the task, so partial configs still start.
pub fn compile_tasks(doc: &Value, callbacks: &CallbackRegistry) -> Result<TaskList> {
    let section = require_section(doc, "tasks")?;
    let tasks = section_entries(section, "task")?
        .into_iter()
        .map(|(name, fragment)| {
            let bindings: TaskBindings = serde_yaml::from_value(fragment.clone())
                .map_err(|e| syntax(name, e.to_string()))?;

            let (bound, missing) = callbacks.resolve_names(&bindings.callbacks);
            for unknown in missing {
                warn!(
                    task = %name,
                    callback = %unknown,
                    "task references unknown callback; dropping it"
                );
            }

            task_from_config(name, fragment, bound)
        })
        .collect::<Result<TaskList>>()?;

    info!(count = tasks.len(), "tasks compiled");
    Ok(tasks)
}

/// Read the optional `log_stderr` / `log_journal` / `log_file` sections.
pub fn compile_logging(doc: &Value) -> Result<LoggingConfig> {
    let root = root_mapping(doc)?;
    let mut logging = LoggingConfig::default();

    if let Some(section) = root.get("log_stderr") {
        logging.stderr = Some(match section {
            Value::Null => LogStderrSection::default(),
            other => serde_yaml::from_value(other.clone())
                .map_err(|e| WatchhookError::Config(format!("log_stderr: {e}")))?,
        });
    }

    if let Some(section) = root.get("log_journal") {
        logging.journal = Some(match section {
            Value::Null => LogJournalSection::default(),
            other => serde_yaml::from_value(other.clone())
                .map_err(|e| WatchhookError::Config(format!("log_journal: {e}")))?,
        });
    }

    if let Some(section) = root.get("log_file") {
        if section.is_null() {
            return Err(WatchhookError::Config(
                "log_file requires a `path`".to_string(),
            ));
        }
        let file: LogFileSection = serde_yaml::from_value(section.clone())
            .map_err(|e| WatchhookError::Config(format!("log_file: {e}")))?;
        logging.file = Some(file);
    }

    Ok(logging)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LogLevel;

    fn doc(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn logging_sections_are_optional() {
        let logging = compile_logging(&doc("callbacks: {}")).unwrap();
        assert_eq!(logging.sink_count(), 0);
    }

    #[test]
    fn empty_log_stderr_enables_default_sink() {
        let logging = compile_logging(&doc("log_stderr:\n")).unwrap();
        assert_eq!(logging.sink_count(), 1);
        assert_eq!(logging.stderr.unwrap().level, None);
    }

    #[test]
    fn log_levels_are_validated() {
        let logging = compile_logging(&doc("log_stderr:\n  level: info\n")).unwrap();
        assert_eq!(logging.stderr.unwrap().level, Some(LogLevel::Info));

        assert!(matches!(
            compile_logging(&doc("log_stderr:\n  level: notalevel\n")),
            Err(WatchhookError::Config(_))
        ));
    }

    #[test]
    fn journal_section_like_stderr() {
        let logging = compile_logging(&doc("log_journal:\n")).unwrap();
        assert_eq!(logging.journal.unwrap().level, None);

        let logging = compile_logging(&doc("log_journal:\n  level: info\n")).unwrap();
        assert_eq!(logging.journal.unwrap().level, Some(LogLevel::Info));

        assert!(matches!(
            compile_logging(&doc("log_journal:\n  level: notalevel\n")),
            Err(WatchhookError::Config(_))
        ));

        let logging = compile_logging(&doc(
            "log_stderr:\nlog_journal:\nlog_file:\n  path: /tmp/watchhook-test.log\n",
        ))
        .unwrap();
        assert_eq!(logging.sink_count(), 3);
    }

    #[test]
    fn log_file_needs_path() {
        assert!(matches!(
            compile_logging(&doc("log_file:\n")),
            Err(WatchhookError::Config(_))
        ));
        let logging = compile_logging(&doc(
            "log_stderr:\nlog_file:\n  path: /tmp/watchhook-test.log\n  level: debug\n",
        ))
        .unwrap();
        assert_eq!(logging.sink_count(), 2);
        let file = logging.file.unwrap();
        assert_eq!(file.path, std::path::PathBuf::from("/tmp/watchhook-test.log"));
        assert_eq!(file.level, Some(LogLevel::Debug));
    }
}
