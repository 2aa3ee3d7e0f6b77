#![allow(dead_code)]

use std::path::PathBuf;

use taskfarm::config::{RawWorkerConfig, WorkerConfig};

/// Builder for `WorkerConfig` to simplify test setup.
///
/// Goes through the same validation as real configs.
pub struct WorkerConfigBuilder {
    config: RawWorkerConfig,
}

impl WorkerConfigBuilder {
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self {
            config: RawWorkerConfig {
                store_path: Some(store_path.into()),
                ..RawWorkerConfig::default()
            },
        }
    }

    pub fn verbose(mut self, val: bool) -> Self {
        self.config.verbose = Some(val);
        self
    }

    pub fn wait_on_idle(mut self, sleep_seconds: u64) -> Self {
        self.config.wait_on_idle = Some(true);
        self.config.sleep_seconds = Some(sleep_seconds);
        self
    }

    pub fn retry(mut self, max_retries: u32) -> Self {
        self.config.retry = Some(true);
        self.config.max_retries = Some(max_retries);
        self
    }

    pub fn disallow(mut self, cmd: &str) -> Self {
        self.config
            .disallowed_commands
            .get_or_insert_with(Vec::new)
            .push(cmd.to_string());
        self
    }

    pub fn allow_everything(mut self) -> Self {
        self.config.disallowed_commands = Some(Vec::new());
        self
    }

    pub fn build(self) -> WorkerConfig {
        WorkerConfig::try_from(self.config).expect("Failed to build valid config from builder")
    }
}
