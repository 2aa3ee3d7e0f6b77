// src/engine/worker.rs

use std::fmt;
use std::sync::Arc;

use anyhow::anyhow;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::exec::ExecutorBackend;
use crate::rank::Rank;
use crate::store::{Claim, JobStore};

use super::core::WorkerCore;
use super::{WorkerCommand, WorkerEvent, WorkerSummary};

/// Drives a `WorkerCore` against a job store and an executor.
///
/// This is the IO shell around the core, which holds all worker semantics.
/// Claims run on Tokio's blocking pool because acquiring the job file lock
/// blocks; jobs run through the `ExecutorBackend`, entirely outside the lock.
pub struct Worker<S: JobStore + 'static, E: ExecutorBackend> {
    rank: Rank,
    core: WorkerCore,
    store: Arc<S>,
    executor: E,
}

impl<S: JobStore + 'static, E: ExecutorBackend> fmt::Debug for Worker<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worker")
            .field("rank", &self.rank)
            .field("core", &self.core)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl<S: JobStore + 'static, E: ExecutorBackend> Worker<S, E> {
    pub fn new(rank: Rank, core: WorkerCore, store: S, executor: E) -> Self {
        Self {
            rank,
            core,
            store: Arc::new(store),
            executor,
        }
    }

    /// Main worker loop.
    ///
    /// Returns once the core terminates (empty store with idle waiting off).
    /// A missing job file or a locking failure ends the loop with an error;
    /// job failures never do.
    pub async fn run(mut self) -> Result<WorkerSummary> {
        debug!(rank = %self.rank, "worker loop started");

        let mut step = self.core.start();

        loop {
            let mut next_event = None;
            for command in step.commands {
                if let Some(event) = self.execute_command(command).await? {
                    next_event = Some(event);
                }
            }

            if !step.keep_running {
                break;
            }

            let Some(event) = next_event else {
                return Err(
                    anyhow!("worker core issued no claim, run or sleep while running").into(),
                );
            };
            step = self.core.step(event);
        }

        let summary = self.core.summary();
        info!(rank = %self.rank, %summary, "worker finished");
        Ok(summary)
    }

    /// Carry out one core command, returning the event it produced, if any.
    async fn execute_command(&mut self, command: WorkerCommand) -> Result<Option<WorkerEvent>> {
        let rank = self.rank;

        match command {
            WorkerCommand::Claim => {
                let claim = self.claim().await?;
                Ok(Some(WorkerEvent::Claimed(claim)))
            }
            WorkerCommand::Run { job, attempt } => {
                if attempt == 1 {
                    info!(rank = %rank, "Rank {rank} launching: {job}");
                } else {
                    info!(rank = %rank, attempt, "Rank {rank} relaunching: {job}");
                }
                let outcome = self.executor.run_job(&job).await;
                Ok(Some(WorkerEvent::AttemptFinished(outcome)))
            }
            WorkerCommand::Sleep(interval) => {
                info!(
                    rank = %rank,
                    sleep_secs = interval.as_secs(),
                    "Rank {rank} waiting for more jobs"
                );
                tokio::time::sleep(interval).await;
                Ok(Some(WorkerEvent::IdleElapsed))
            }
            WorkerCommand::Discard { job, rejection } => {
                warn!(rank = %rank, "Rank {rank} rejected job ({rejection}): {job}");
                Ok(None)
            }
            WorkerCommand::AttemptFailed {
                job,
                attempt,
                max_attempts,
                exit_code,
            } => {
                match max_attempts {
                    Some(max) => warn!(
                        rank = %rank,
                        exit_code,
                        "Rank {rank} command failed ({attempt}/{max}): {job}"
                    ),
                    None => warn!(rank = %rank, exit_code, "Rank {rank} command failed: {job}"),
                }
                Ok(None)
            }
            WorkerCommand::Finished { job, attempts } => {
                info!(rank = %rank, attempts, "Rank {rank} finished: {job}");
                Ok(None)
            }
            WorkerCommand::Abandon { job, attempts } => {
                warn!(
                    rank = %rank,
                    attempts,
                    "Rank {rank} giving up after {attempts} attempt(s): {job}"
                );
                Ok(None)
            }
            WorkerCommand::Exit => {
                info!(rank = %rank, "Job file is empty: Rank {rank} exiting");
                Ok(None)
            }
        }
    }

    async fn claim(&self) -> Result<Claim> {
        let store = Arc::clone(&self.store);
        let claim = tokio::task::spawn_blocking(move || store.claim())
            .await
            .map_err(anyhow::Error::from)??;
        Ok(claim)
    }
}
