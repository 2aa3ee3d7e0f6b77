// src/exec/mod.rs

//! Job execution layer.
//!
//! Jobs run outside the job file lock, so any number of workers may be
//! executing at once; a long job never holds up another worker's claims.
//!
//! - [`backend`] provides the `ExecutorBackend` trait and the production
//!   `ShellExecutor`, which tests can replace with a fake implementation.
//! - [`retry`] decides, after each attempt, whether a job runs again.

pub mod backend;
pub mod retry;

pub use backend::{ExecutorBackend, ShellExecutor};
pub use retry::{RetryDecision, RetryPolicy};
