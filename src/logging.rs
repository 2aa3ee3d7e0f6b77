// src/logging.rs

//! Logging setup for `taskfarm` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `TASKFARM_LOG` environment variable (e.g. "info", "debug")
//! 3. `info` in verbose mode, `warn` otherwise
//!
//! Warnings and errors go to STDERR; status lines (launches, idle waits,
//! exits) go to STDOUT.

use std::io::IsTerminal;

use anyhow::{Result, anyhow};
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use crate::cli::LogLevel;

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(verbose: bool, cli_level: Option<LogLevel>) -> Result<()> {
    let env_level = std::env::var("TASKFARM_LOG").ok();
    let level = effective_level(verbose, cli_level, env_level.as_deref());

    let writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .or_else(std::io::stdout);

    fmt()
        .with_max_level(level)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(writer)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))?;

    Ok(())
}

/// Resolve the level from the CLI flag, the environment value and the
/// verbose switch, in that order.
pub fn effective_level(
    verbose: bool,
    cli_level: Option<LogLevel>,
    env_level: Option<&str>,
) -> tracing::Level {
    if let Some(lvl) = cli_level {
        return level_from_log_level(lvl);
    }
    if let Some(lvl) = env_level.and_then(parse_level_str) {
        return lvl;
    }
    if verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    }
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
