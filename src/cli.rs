// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::Parser;

use crate::types::LogLevel;

/// Command-line arguments for `watchhook`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "watchhook",
    version,
    about = "Run shell commands and log records when watched files change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the YAML config file.
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Logging level for stderr (error, warn, info, debug, trace).
    ///
    /// If omitted, `WATCHHOOK_LOG`, the config's `log_stderr.level`, or
    /// `info` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load and compile the config, print tasks and callbacks, but don't
    /// watch anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_is_positional() {
        let args = CliArgs::try_parse_from(["watchhook", "conf.yaml", "--log-level", "debug"])
            .unwrap();
        assert_eq!(args.config, PathBuf::from("conf.yaml"));
        assert_eq!(args.log_level, Some(LogLevel::Debug));
        assert!(!args.dry_run);
    }

    #[test]
    fn config_is_required() {
        assert!(CliArgs::try_parse_from(["watchhook"]).is_err());
    }
}
