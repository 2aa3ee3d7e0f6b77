// src/exec/retry.rs

use crate::engine::JobOutcome;

/// What to do after an execution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// The job succeeded.
    Finished,
    /// The job failed and has attempts left.
    RetryAgain,
    /// The job failed and its budget is spent; abandon it.
    Exhausted,
}

/// Bound on execution attempts for a single claimed job.
///
/// With retrying disabled the bound is one attempt. An abandoned job is
/// never handed back to the job store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    retry_enabled: bool,
}

impl RetryPolicy {
    /// A single attempt per job.
    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            retry_enabled: false,
        }
    }

    /// Up to `max_retries` attempts per job (at least one).
    pub fn up_to(max_retries: u32) -> Self {
        Self {
            max_attempts: max_retries.max(1),
            retry_enabled: true,
        }
    }

    pub fn from_flags(retry: bool, max_retries: u32) -> Self {
        if retry {
            Self::up_to(max_retries)
        } else {
            Self::once()
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn retry_enabled(&self) -> bool {
        self.retry_enabled
    }

    /// Decide after `attempts` attempts, the latest of which ended in
    /// `outcome`.
    pub fn decide(&self, attempts: u32, outcome: JobOutcome) -> RetryDecision {
        match outcome {
            JobOutcome::Success => RetryDecision::Finished,
            JobOutcome::Failed(_) if attempts < self.max_attempts => RetryDecision::RetryAgain,
            JobOutcome::Failed(_) => RetryDecision::Exhausted,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::once()
    }
}
