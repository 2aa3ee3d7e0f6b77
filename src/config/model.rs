// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::exec::RetryPolicy;
use crate::policy::DenylistPolicy;
use crate::policy::denylist::DEFAULT_DISALLOWED;
use crate::types::IdlePolicy;

pub const DEFAULT_SLEEP_SECONDS: u64 = 300;
pub const DEFAULT_MAX_RETRIES: u32 = 10;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [worker]
/// store_path = "jobs.txt"
/// wait_on_idle = true
/// sleep_seconds = 60
/// retry = true
/// max_retries = 3
/// disallowed_commands = ["rm", "shutdown"]
/// ```
///
/// Every key is optional; CLI flags are layered on top.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub worker: RawWorkerConfig,
}

/// Unvalidated worker settings from one source (file or CLI).
///
/// `None` means "not specified here", so sources can be merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawWorkerConfig {
    #[serde(default)]
    pub store_path: Option<PathBuf>,
    #[serde(default)]
    pub verbose: Option<bool>,
    #[serde(default)]
    pub wait_on_idle: Option<bool>,
    #[serde(default)]
    pub retry: Option<bool>,
    #[serde(default)]
    pub sleep_seconds: Option<u64>,
    #[serde(default)]
    pub max_retries: Option<u32>,
    #[serde(default)]
    pub disallowed_commands: Option<Vec<String>>,
}

impl RawWorkerConfig {
    /// Layer `overrides` on top of `self`; values set in `overrides` win.
    pub fn merge(self, overrides: RawWorkerConfig) -> RawWorkerConfig {
        RawWorkerConfig {
            store_path: overrides.store_path.or(self.store_path),
            verbose: overrides.verbose.or(self.verbose),
            wait_on_idle: overrides.wait_on_idle.or(self.wait_on_idle),
            retry: overrides.retry.or(self.retry),
            sleep_seconds: overrides.sleep_seconds.or(self.sleep_seconds),
            max_retries: overrides.max_retries.or(self.max_retries),
            disallowed_commands: overrides.disallowed_commands.or(self.disallowed_commands),
        }
    }
}

/// Validated worker configuration.
///
/// Build one through `WorkerConfig::try_from(RawWorkerConfig)` or
/// [`crate::config::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub store_path: PathBuf,
    pub verbose: bool,
    pub wait_on_idle: bool,
    pub retry: bool,
    pub sleep_seconds: u64,
    pub max_retries: u32,
    pub disallowed_commands: Vec<String>,
}

impl WorkerConfig {
    /// Config for `store_path` with every other setting at its default.
    pub fn with_defaults(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
            verbose: false,
            wait_on_idle: false,
            retry: false,
            sleep_seconds: DEFAULT_SLEEP_SECONDS,
            max_retries: DEFAULT_MAX_RETRIES,
            disallowed_commands: DEFAULT_DISALLOWED.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Attempts per job: `max_retries` with retrying on, otherwise one.
    pub fn max_attempts(&self) -> u32 {
        self.retry_policy().max_attempts()
    }

    pub fn sleep_duration(&self) -> Duration {
        Duration::from_secs(self.sleep_seconds)
    }

    pub fn idle_policy(&self) -> IdlePolicy {
        IdlePolicy::from_flags(self.wait_on_idle, self.sleep_duration())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from_flags(self.retry, self.max_retries)
    }

    pub fn command_policy(&self) -> DenylistPolicy {
        DenylistPolicy::new(self.disallowed_commands.iter().cloned())
    }
}
