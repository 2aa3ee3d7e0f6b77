// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The worker talks to an `ExecutorBackend` instead of spawning processes
//! itself. This makes it easy to swap in a fake executor in tests while
//! keeping the production implementation here.
//!
//! - `ShellExecutor` is the default implementation used by `taskfarm`. It
//!   runs each job through the platform shell and waits for it to exit.
//! - Tests can provide their own `ExecutorBackend` that, for example,
//!   records which jobs were run and returns scripted outcomes.

use std::future::Future;
use std::pin::Pin;

use tokio::process::Command;
use tracing::{debug, error};

use crate::engine::JobOutcome;

/// Trait abstracting how a single execution attempt is performed.
///
/// Each call is one attempt; retrying is the worker's business.
pub trait ExecutorBackend: Send {
    /// Run `job` to completion and report how it exited.
    ///
    /// Failing to start the job at all is reported as `Failed(-1)`.
    fn run_job<'a>(
        &'a mut self,
        job: &'a str,
    ) -> Pin<Box<dyn Future<Output = JobOutcome> + Send + 'a>>;
}

/// Production executor: `sh -c <job>` (or `cmd /C` on Windows).
///
/// The child inherits the worker's stdin, stdout and stderr, so jobs should
/// redirect their own output if it must not mix with worker status lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellExecutor;

impl ShellExecutor {
    pub fn new() -> Self {
        Self
    }

    fn command(job: &str) -> Command {
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(job);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(job);
            c
        };
        cmd.kill_on_drop(true);
        cmd
    }
}

impl ExecutorBackend for ShellExecutor {
    fn run_job<'a>(
        &'a mut self,
        job: &'a str,
    ) -> Pin<Box<dyn Future<Output = JobOutcome> + Send + 'a>> {
        Box::pin(async move {
            let status = match Self::command(job).status().await {
                Ok(status) => status,
                Err(e) => {
                    error!(job = %job, error = %e, "failed to spawn job process");
                    return JobOutcome::Failed(-1);
                }
            };

            // No exit code means the child was killed by a signal.
            let code = status.code().unwrap_or(-1);
            debug!(job = %job, exit_code = code, success = status.success(), "job process exited");

            if status.success() {
                JobOutcome::Success
            } else {
                JobOutcome::Failed(code)
            }
        })
    }
}
