// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskfarmError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The job file was missing when a worker tried to open it.
    ///
    /// Fatal for the worker that observes it; other workers are unaffected.
    #[error("Job file {0:?} doesn't exist")]
    StoreNotFound(PathBuf),

    #[error("Locking job file {path:?} failed: {source}")]
    LockError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TaskfarmError>;
