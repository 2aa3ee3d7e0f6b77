// src/engine/core.rs

//! Pure worker state machine.
//!
//! This module contains a synchronous, deterministic "core" that consumes
//! [`WorkerEvent`]s and produces:
//! - an updated worker state
//! - a list of commands describing what the IO shell should do next
//!
//! The async shell (`engine::worker::Worker`) is responsible for:
//! - running claim transactions against the job store
//! - executing jobs through an `ExecutorBackend`
//! - sleeping while idle
//! - logging
//!
//! The core is intended to be unit tested without any Tokio, filesystem, or
//! processes.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::WorkerConfig;
use crate::exec::{RetryDecision, RetryPolicy};
use crate::policy::{CommandPolicy, Rejection, Verdict};
use crate::store::{Claim, Job};
use crate::types::IdlePolicy;

use super::{JobOutcome, WorkerCommand, WorkerEvent, WorkerState, WorkerStep, WorkerSummary};

/// Pure core worker state.
///
/// It owns the current job and its attempt counter, the command policy, the
/// retry bound and the idle policy. It has no channels or Tokio types, and it
/// performs no IO.
#[derive(Debug)]
pub struct WorkerCore {
    state: WorkerState,
    policy: Arc<dyn CommandPolicy>,
    retry: RetryPolicy,
    idle: IdlePolicy,
    summary: WorkerSummary,
}

impl WorkerCore {
    pub fn new(policy: Arc<dyn CommandPolicy>, retry: RetryPolicy, idle: IdlePolicy) -> Self {
        Self {
            state: WorkerState::Claim,
            policy,
            retry,
            idle,
            summary: WorkerSummary::default(),
        }
    }

    pub fn from_config(cfg: &WorkerConfig) -> Self {
        Self::new(
            Arc::new(cfg.command_policy()),
            cfg.retry_policy(),
            cfg.idle_policy(),
        )
    }

    pub fn state(&self) -> &WorkerState {
        &self.state
    }

    pub fn summary(&self) -> WorkerSummary {
        self.summary
    }

    pub fn is_terminated(&self) -> bool {
        self.state == WorkerState::Terminated
    }

    /// The opening step: claim the first job.
    pub fn start(&mut self) -> WorkerStep {
        self.state = WorkerState::Claim;
        running(vec![WorkerCommand::Claim])
    }

    /// Handle a single event, updating state and returning the resulting
    /// commands for the IO shell.
    pub fn step(&mut self, event: WorkerEvent) -> WorkerStep {
        let state = std::mem::replace(&mut self.state, WorkerState::Terminated);

        match (state, event) {
            (WorkerState::Claim, WorkerEvent::Claimed(Claim::Job(job))) => self.on_claimed(job),
            (WorkerState::Claim, WorkerEvent::Claimed(Claim::Undecodable(job))) => {
                self.summary.claimed += 1;
                self.discard(job, Rejection::InvalidEncoding)
            }
            (WorkerState::Claim, WorkerEvent::Claimed(Claim::Empty)) => self.on_empty(),
            (WorkerState::Execute { job, attempts }, WorkerEvent::AttemptFinished(outcome)) => {
                self.on_attempt(job, attempts + 1, outcome)
            }
            (WorkerState::Idle, WorkerEvent::IdleElapsed) => {
                self.state = WorkerState::Claim;
                running(vec![WorkerCommand::Claim])
            }
            (state, event) => {
                warn!(?state, ?event, "event does not apply to current worker state; ignoring");
                let keep_running = state != WorkerState::Terminated;
                self.state = state;
                WorkerStep {
                    commands: Vec::new(),
                    keep_running,
                }
            }
        }
    }

    fn on_claimed(&mut self, job: Job) -> WorkerStep {
        self.summary.claimed += 1;

        match self.policy.check(&job) {
            Verdict::Allowed => {
                debug!(job = %job, "job allowed by command policy");
                self.state = WorkerState::Execute {
                    job: job.clone(),
                    attempts: 0,
                };
                running(vec![WorkerCommand::Run { job, attempt: 1 }])
            }
            Verdict::Rejected(rejection) => self.discard(job, rejection),
        }
    }

    fn discard(&mut self, job: Job, rejection: Rejection) -> WorkerStep {
        self.summary.rejected += 1;
        self.state = WorkerState::Claim;
        running(vec![
            WorkerCommand::Discard { job, rejection },
            WorkerCommand::Claim,
        ])
    }

    fn on_empty(&mut self) -> WorkerStep {
        match self.idle {
            IdlePolicy::Wait(interval) => {
                self.summary.idle_waits += 1;
                self.state = WorkerState::Idle;
                running(vec![WorkerCommand::Sleep(interval)])
            }
            IdlePolicy::Exit => {
                self.state = WorkerState::Terminated;
                WorkerStep {
                    commands: vec![WorkerCommand::Exit],
                    keep_running: false,
                }
            }
        }
    }

    fn on_attempt(&mut self, job: Job, attempts: u32, outcome: JobOutcome) -> WorkerStep {
        self.summary.attempts += 1;

        let mut commands = Vec::new();
        if let JobOutcome::Failed(exit_code) = outcome {
            commands.push(WorkerCommand::AttemptFailed {
                job: job.clone(),
                attempt: attempts,
                max_attempts: self.retry.retry_enabled().then_some(self.retry.max_attempts()),
                exit_code,
            });
        }

        match self.retry.decide(attempts, outcome) {
            RetryDecision::Finished => {
                self.summary.succeeded += 1;
                self.state = WorkerState::Claim;
                commands.push(WorkerCommand::Finished { job, attempts });
                commands.push(WorkerCommand::Claim);
            }
            RetryDecision::RetryAgain => {
                commands.push(WorkerCommand::Run {
                    job: job.clone(),
                    attempt: attempts + 1,
                });
                self.state = WorkerState::Execute { job, attempts };
            }
            RetryDecision::Exhausted => {
                self.summary.failed += 1;
                self.state = WorkerState::Claim;
                commands.push(WorkerCommand::Abandon { job, attempts });
                commands.push(WorkerCommand::Claim);
            }
        }

        running(commands)
    }
}

fn running(commands: Vec<WorkerCommand>) -> WorkerStep {
    WorkerStep {
        commands,
        keep_running: true,
    }
}
