// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::cli::CliArgs;
use crate::config::model::{ConfigFile, RawWorkerConfig, WorkerConfig};
use crate::errors::Result;

/// Load a configuration file from a given path.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`resolve`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: ConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Build the effective worker configuration for this process.
///
/// Precedence, lowest first:
/// - built-in defaults
/// - the `[worker]` table of `--config`, if given
/// - command-line flags
///
/// The merged result is validated before it is returned.
pub fn resolve(args: &CliArgs) -> Result<WorkerConfig> {
    let file = match args.config {
        Some(ref path) => load_from_path(path)?.worker,
        None => RawWorkerConfig::default(),
    };

    let merged = file.merge(RawWorkerConfig::from(args));
    WorkerConfig::try_from(merged)
}

impl From<&CliArgs> for RawWorkerConfig {
    fn from(args: &CliArgs) -> Self {
        // Boolean flags can only switch a feature on.
        let flag = |set: bool| set.then_some(true);

        RawWorkerConfig {
            store_path: args.file.clone(),
            verbose: flag(args.verbose),
            wait_on_idle: flag(args.wait_on_idle),
            retry: flag(args.retry),
            sleep_seconds: args.sleep_time,
            max_retries: args.max_retries,
            disallowed_commands: args.disallowed.clone(),
        }
    }
}
