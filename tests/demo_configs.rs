// tests/demo_configs.rs

mod common;
use crate::common::{init_tracing, RecordingCommandRunner};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use watchhook::callbacks::CallbackContext;
use watchhook::config::{compile, load_document, CompiledConfig};
use watchhook::types::LogLevel;

fn demo(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

fn compile_demo(name: &str) -> CompiledConfig {
    init_tracing();
    let doc = load_document(demo(name)).expect("demo parses");
    compile(&doc, &CallbackContext::new(Arc::new(RecordingCommandRunner::new())))
        .expect("demo compiles")
}

#[test]
fn archive_demo_compiles() {
    let cfg = compile_demo("archive.yaml");

    assert_eq!(cfg.callbacks.names().collect::<Vec<_>>(), vec!["archive", "note-delete"]);
    assert_eq!(cfg.callbacks.get("note-delete").unwrap().kind(), "logger");
    assert_eq!(cfg.tasks.len(), 2);
    assert_eq!(cfg.tasks.units().count(), 2);
    assert_eq!(
        cfg.logging.stderr.as_ref().and_then(|s| s.level),
        Some(LogLevel::Info)
    );
    assert!(cfg.logging.file.is_none());
}

#[test]
fn changelog_demo_compiles() {
    let cfg = compile_demo("changelog.yaml");

    let task = cfg.tasks.get("src").expect("task present");
    assert_eq!(task.kind(), "watchfiles");
    let bound: Vec<&str> = task.callbacks().iter().map(|c| c.name()).collect();
    assert_eq!(bound, vec!["notify", "trace"]);

    assert_eq!(cfg.logging.sink_count(), 2);
    let file = cfg.logging.file.as_ref().expect("log_file section");
    assert_eq!(file.level, Some(LogLevel::Debug));
}
