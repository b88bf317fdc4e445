// src/lib.rs

pub mod attrs;
pub mod callbacks;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod tasks;
pub mod types;
pub mod watch;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::callbacks::CallbackContext;
use crate::cli::CliArgs;
use crate::config::{
    compile_callbacks, compile_logging, compile_tasks, load_document, CompiledConfig,
};
use crate::engine::{RunReport, Runner, RunnerOptions, ShutdownCause};
use crate::watch::NotifyWatchService;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - logging setup from CLI + config
/// - callback / task compilation
/// - the runner, with the `notify` watch service and signal handling
/// Returns `None` for `--dry-run`.
pub async fn run(args: CliArgs) -> Result<Option<RunReport>> {
    let doc = load_document(&args.config)
        .with_context(|| format!("loading config file {:?}", args.config))?;

    let logging = compile_logging(&doc)?;
    logging::init_logging(args.log_level, &logging)?;

    let callbacks = compile_callbacks(&doc, &CallbackContext::default())?;
    let tasks = compile_tasks(&doc, &callbacks)?;
    let cfg = CompiledConfig {
        logging,
        callbacks,
        tasks,
    };

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(None);
    }

    let runner = Runner::new(
        cfg.tasks,
        Arc::new(NotifyWatchService::default()),
        RunnerOptions::default(),
    );
    let report = runner.run().await?;

    if let ShutdownCause::UnitFailure { unit, error } = &report.cause {
        info!(unit = %unit, error = %error, "stopped after unexpected failure");
    }

    Ok(Some(report))
}

/// Simple dry-run output: print callbacks, tasks and their bindings.
fn print_dry_run(cfg: &CompiledConfig) {
    println!("watchhook dry-run");
    println!();

    println!("callbacks ({}):", cfg.callbacks.len());
    for (name, callback) in cfg.callbacks.iter() {
        println!("  - {name} ({})", callback.kind());
    }
    println!();

    println!("tasks ({}):", cfg.tasks.len());
    for task in cfg.tasks.iter() {
        println!("  - {} ({})", task.name(), task.kind());
        let bound: Vec<&str> = task.callbacks().iter().map(|c| c.name()).collect();
        println!("      callbacks: {bound:?}");
    }

    debug!("dry-run complete (no watching)");
}
