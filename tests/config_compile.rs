// tests/config_compile.rs

mod common;
use crate::common::builders::{logger, shell, ConfigBuilder, WatchTaskBuilder};
use crate::common::{init_tracing, RecordingCommandRunner};

use std::sync::Arc;

use serde_yaml::Value;
use watchhook::callbacks::CallbackContext;
use watchhook::config::{compile, load_and_compile, parse_document};
use watchhook::errors::WatchhookError;

fn ctx() -> CallbackContext {
    CallbackContext::new(Arc::new(RecordingCommandRunner::new()))
}

#[test]
fn shell_without_command_fails_before_tasks_are_built() {
    init_tracing();

    // The tasks section is missing too; the callback error must win.
    let doc = parse_document(
        r#"
callbacks:
  broken:
    type: shell
"#,
    )
    .unwrap();

    match compile(&doc, &ctx()) {
        Err(WatchhookError::CallbackSyntax { name, reason }) => {
            assert_eq!(name, "broken");
            assert!(reason.contains("command"), "reason: {reason}");
        }
        other => panic!("expected CallbackSyntax, got {other:?}"),
    }
}

#[test]
fn failing_task_returns_no_registry() {
    init_tracing();

    let doc = ConfigBuilder::new()
        .with_shell("echo", "echo {path}")
        .with_task(
            "good",
            WatchTaskBuilder::new()
                .change("added")
                .path("/tmp")
                .callback("echo"),
        )
        .with_task(
            "bad",
            WatchTaskBuilder::new().change("added").callback("echo"),
        )
        .build();

    match compile(&doc, &ctx()) {
        Err(WatchhookError::TaskSyntax { name, reason }) => {
            assert_eq!(name, "bad");
            assert!(reason.contains("paths"), "reason: {reason}");
        }
        other => panic!("expected TaskSyntax, got {other:?}"),
    }
}

#[test]
fn unresolvable_callback_names_are_dropped() {
    init_tracing();

    let doc = ConfigBuilder::new()
        .with_shell("real", "true")
        .with_task(
            "t",
            WatchTaskBuilder::new()
                .change("added")
                .path("/tmp")
                .callback("real")
                .callback("imaginary"),
        )
        .build();

    let cfg = compile(&doc, &ctx()).unwrap();
    let task = cfg.tasks.get("t").expect("task compiled");
    let bound: Vec<&str> = task.callbacks().iter().map(|c| c.name()).collect();
    assert_eq!(bound, vec!["real"]);
    assert_eq!(cfg.tasks.units().count(), 1);
}

#[test]
fn unknown_types_are_unsupported_variants() {
    let mut webhook = serde_yaml::Mapping::new();
    webhook.insert("type".into(), "webhook".into());
    let doc = ConfigBuilder::new()
        .with_callback("hook", Value::Mapping(webhook))
        .build();

    match compile(&doc, &ctx()) {
        Err(WatchhookError::UnsupportedVariant {
            entity,
            name,
            variant,
        }) => {
            assert_eq!(entity, "callback");
            assert_eq!(name, "hook");
            assert_eq!(variant, "webhook");
        }
        other => panic!("expected UnsupportedVariant, got {other:?}"),
    }

    let mut poll = serde_yaml::Mapping::new();
    poll.insert("type".into(), "pollfiles".into());
    poll.insert("callbacks".into(), Value::Sequence(vec![]));
    let doc = ConfigBuilder::new()
        .with_shell("echo", "true")
        .with_raw_task("poller", Value::Mapping(poll))
        .build();

    assert!(matches!(
        compile(&doc, &ctx()),
        Err(WatchhookError::UnsupportedVariant { entity: "task", .. })
    ));
}

#[test]
fn missing_sections_are_structural_errors() {
    let doc = parse_document("tasks: {}\n").unwrap();
    match compile(&doc, &ctx()) {
        Err(WatchhookError::Config(msg)) => assert!(msg.contains("callbacks"), "msg: {msg}"),
        other => panic!("expected Config error, got {other:?}"),
    }

    let doc = parse_document("callbacks: {}\n").unwrap();
    match compile(&doc, &ctx()) {
        Err(WatchhookError::Config(msg)) => assert!(msg.contains("tasks"), "msg: {msg}"),
        other => panic!("expected Config error, got {other:?}"),
    }
}

#[test]
fn loads_file_written_by_builder() {
    let dir = tempfile::tempdir().unwrap();
    let path = ConfigBuilder::new()
        .with_section("log_stderr", Value::Null)
        .with_callback("trace", logger("{path} was {change}", Some("warn")))
        .with_callback("copy", shell("cp {path} {dest}"))
        .with_task(
            "incoming",
            WatchTaskBuilder::new()
                .change("added")
                .change("modified")
                .path(dir.path())
                .attr("dest", "/srv/archive")
                .callback("copy")
                .callback("trace"),
        )
        .write_to(dir.path());

    let cfg = load_and_compile(&path).unwrap();
    assert_eq!(cfg.callbacks.len(), 2);
    assert_eq!(cfg.tasks.len(), 1);
    assert_eq!(cfg.tasks.units().count(), 2);
    assert_eq!(cfg.logging.sink_count(), 1);
}

#[test]
fn yaml_errors_surface_as_yaml_variant() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    std::fs::write(&path, "callbacks: [unclosed\n").unwrap();

    assert!(matches!(
        load_and_compile(&path),
        Err(WatchhookError::Yaml(_))
    ));
}
