// src/engine/mod.rs

//! Per-worker engine for taskfarm.
//!
//! A worker cycles through four states:
//!
//! ```text
//! Claim -> { Execute, Idle, Terminated }
//! Execute -> Claim
//! Idle -> Claim        (after sleeping)
//! Terminated           (absorbing)
//! ```
//!
//! The pure state machine lives in [`core`]; the async/IO shell that claims
//! from the store, runs jobs and sleeps is implemented in [`worker`].
//!
//! There is no global stop signal. Each worker decides on its own when it
//! sees an empty job store; wall-time kills happen outside this model.

use std::fmt;
use std::time::Duration;

use crate::policy::Rejection;
use crate::store::{Claim, Job};

/// Outcome of a single job execution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Success,
    Failed(i32),
}

/// Current state of a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerState {
    Claim,
    Execute { job: Job, attempts: u32 },
    Idle,
    Terminated,
}

/// Events fed into the core by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    /// A claim transaction finished.
    Claimed(Claim),
    /// An execution attempt of the current job finished.
    AttemptFinished(JobOutcome),
    /// The idle sleep is over.
    IdleElapsed,
}

/// Actions the core asks the shell to carry out.
///
/// At most one command per step produces a follow-up event (`Claim`, `Run`
/// or `Sleep`); the others are reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerCommand {
    /// Perform a claim transaction.
    Claim,
    /// Execute one attempt of `job`.
    Run { job: Job, attempt: u32 },
    /// Sleep before claiming again.
    Sleep(Duration),
    /// The job was refused by the command policy and dropped.
    Discard { job: Job, rejection: Rejection },
    /// An attempt failed. `max_attempts` is set when retrying is enabled.
    AttemptFailed {
        job: Job,
        attempt: u32,
        max_attempts: Option<u32>,
        exit_code: i32,
    },
    /// The job succeeded after `attempts` attempts.
    Finished { job: Job, attempts: u32 },
    /// The job exhausted its attempts and is dropped.
    Abandon { job: Job, attempts: u32 },
    /// The job store was empty and idle waiting is off.
    Exit,
}

/// Result of one core step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerStep {
    pub commands: Vec<WorkerCommand>,
    pub keep_running: bool,
}

/// Lifetime counters of a worker, reported when it exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerSummary {
    pub claimed: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub rejected: u64,
    pub attempts: u64,
    pub idle_waits: u64,
}

impl fmt::Display for WorkerSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "claimed={} succeeded={} failed={} rejected={} attempts={} idle_waits={}",
            self.claimed, self.succeeded, self.failed, self.rejected, self.attempts, self.idle_waits
        )
    }
}

pub mod core;
pub mod worker;

pub use self::core::WorkerCore;
pub use crate::types::IdlePolicy;
pub use worker::Worker;
