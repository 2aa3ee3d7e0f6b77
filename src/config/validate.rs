// src/config/validate.rs

use crate::config::model::{
    DEFAULT_MAX_RETRIES, DEFAULT_SLEEP_SECONDS, RawWorkerConfig, WorkerConfig,
};
use crate::errors::{Result, TaskfarmError};
use crate::policy::denylist::DEFAULT_DISALLOWED;

impl TryFrom<RawWorkerConfig> for WorkerConfig {
    type Error = crate::errors::TaskfarmError;

    fn try_from(raw: RawWorkerConfig) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;

        Ok(WorkerConfig {
            store_path: raw.store_path.unwrap_or_default(),
            verbose: raw.verbose.unwrap_or(false),
            wait_on_idle: raw.wait_on_idle.unwrap_or(false),
            retry: raw.retry.unwrap_or(false),
            sleep_seconds: raw.sleep_seconds.unwrap_or(DEFAULT_SLEEP_SECONDS),
            max_retries: raw.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            disallowed_commands: raw.disallowed_commands.unwrap_or_else(|| {
                DEFAULT_DISALLOWED.iter().map(|s| s.to_string()).collect()
            }),
        })
    }
}

fn validate_raw_config(cfg: &RawWorkerConfig) -> Result<()> {
    validate_store_path(cfg)?;
    validate_intervals(cfg)?;
    validate_disallowed(cfg)?;
    Ok(())
}

fn validate_store_path(cfg: &RawWorkerConfig) -> Result<()> {
    match cfg.store_path {
        Some(ref path) if !path.as_os_str().is_empty() => Ok(()),
        _ => Err(TaskfarmError::ConfigError(
            "a job file must be specified with -f/--file or [worker].store_path".to_string(),
        )),
    }
}

fn validate_intervals(cfg: &RawWorkerConfig) -> Result<()> {
    if cfg.sleep_seconds == Some(0) {
        return Err(TaskfarmError::ConfigError(
            "sleep_seconds must be greater than zero (got 0)".to_string(),
        ));
    }

    if cfg.max_retries == Some(0) {
        return Err(TaskfarmError::ConfigError(
            "max_retries must be greater than zero (got 0)".to_string(),
        ));
    }

    Ok(())
}

fn validate_disallowed(cfg: &RawWorkerConfig) -> Result<()> {
    let Some(ref disallowed) = cfg.disallowed_commands else {
        return Ok(());
    };

    for cmd in disallowed {
        // An empty entry would match any job containing two spaces.
        if cmd.trim().is_empty() {
            return Err(TaskfarmError::ConfigError(format!(
                "disallowed command {cmd:?} must not be blank"
            )));
        }
    }

    Ok(())
}
