// src/logging.rs

//! Logging setup for `watchhook` using `tracing` + `tracing-subscriber`.
//!
//! Sinks come from the config document (`log_stderr`, `log_file`). Without
//! any `log_*` section a stderr sink is installed.
//!
//! Priority for the stderr level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `WATCHHOOK_LOG` environment variable (e.g. "info", "debug")
//! 3. `log_stderr.level` from the config
//! 4. default to `info`
//!
//! The file sink uses `log_file.level` (default `info`) and never writes ANSI
//! colour codes. The journal sink (`log_journal`, Linux only) uses
//! `log_journal.level` (default `info`).

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::{fmt, registry, Layer};

use crate::config::LoggingConfig;
use crate::types::LogLevel;

pub const LOG_ENV_VAR: &str = "WATCHHOOK_LOG";

/// Initialise the global logging subscriber.
///
/// Safe to call once at startup; a second call fails.
pub fn init_logging(cli_level: Option<LogLevel>, config: &LoggingConfig) -> Result<()> {
    let env_level = std::env::var(LOG_ENV_VAR)
        .ok()
        .and_then(|s| s.parse::<LogLevel>().ok());

    let journal_layer: Option<BoxedLayer> = match &config.journal {
        Some(section) => {
            let level = section.level.unwrap_or_default();
            Some(
                journald_layer()?
                    .with_filter(LevelFilter::from_level(level.as_tracing_level()))
                    .boxed(),
            )
        }
        None => None,
    };

    let stderr_layer = match (&config.stderr, config.sink_count()) {
        (Some(section), _) => Some(stderr_level(cli_level, env_level, section.level)),
        (None, 0) => Some(stderr_level(cli_level, env_level, None)),
        (None, _) => None,
    }
    .map(|level| {
        // Keep stdout free for command output.
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_writer(std::io::stderr)
            .with_filter(LevelFilter::from_level(level.as_tracing_level()))
    });

    let file_layer = match &config.file {
        Some(section) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&section.path)
                .with_context(|| format!("opening log file {:?}", section.path))?;
            let level = section.level.unwrap_or_default();
            Some(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(LevelFilter::from_level(level.as_tracing_level())),
            )
        }
        None => None,
    };

    registry()
        .with(journal_layer)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("installing global tracing subscriber")?;

    Ok(())
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[cfg(target_os = "linux")]
fn journald_layer() -> Result<impl Layer<Registry> + Send + Sync> {
    tracing_journald::layer()
        .map(|layer| layer.with_syslog_identifier("watchhook".to_string()))
        .context("connecting to the systemd journal")
}

#[cfg(not(target_os = "linux"))]
fn journald_layer() -> Result<BoxedLayer> {
    anyhow::bail!("log_journal is only supported on Linux")
}

fn stderr_level(
    cli_level: Option<LogLevel>,
    env_level: Option<LogLevel>,
    config_level: Option<LogLevel>,
) -> LogLevel {
    cli_level
        .or(env_level)
        .or(config_level)
        .unwrap_or_default()
}
