// src/config/mod.rs

//! Configuration loading and validation for taskfarm.
//!
//! Responsibilities:
//! - Define the TOML-backed data model and the validated worker config
//!   (`model.rs`).
//! - Load a config file from disk and layer CLI flags over it (`loader.rs`).
//! - Validate basic invariants like positive intervals (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_from_path, resolve};
pub use model::{
    ConfigFile, RawWorkerConfig, WorkerConfig, DEFAULT_MAX_RETRIES, DEFAULT_SLEEP_SECONDS,
};
