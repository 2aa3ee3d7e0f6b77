// src/store/mock.rs

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::anyhow;

use super::{Claim, Job, JobStore};
use crate::errors::Result;

/// In-memory job store.
///
/// Clones share the same queue, so a test can hand one clone to a worker and
/// keep another to inspect or extend the queue while the worker runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryJobStore {
    jobs: Arc<Mutex<VecDeque<Job>>>,
    claims: Arc<Mutex<usize>>,
}

impl MemoryJobStore {
    pub fn new<I, S>(jobs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Job>,
    {
        Self {
            jobs: Arc::new(Mutex::new(jobs.into_iter().map(Into::into).collect())),
            claims: Arc::new(Mutex::new(0)),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of claim transactions performed, including empty ones.
    pub fn claim_count(&self) -> usize {
        self.claims.lock().map(|c| *c).unwrap_or_default()
    }

    fn queue(&self) -> Result<MutexGuard<'_, VecDeque<Job>>> {
        self.jobs
            .lock()
            .map_err(|_| anyhow!("memory job store mutex poisoned").into())
    }
}

impl JobStore for MemoryJobStore {
    fn claim(&self) -> Result<Claim> {
        let mut queue = self.queue()?;
        if let Ok(mut claims) = self.claims.lock() {
            *claims += 1;
        }
        Ok(match queue.pop_front() {
            Some(job) => Claim::Job(job),
            None => Claim::Empty,
        })
    }

    fn pending(&self) -> Result<Vec<Job>> {
        Ok(self.queue()?.iter().cloned().collect())
    }

    fn append(&self, jobs: &[Job]) -> Result<()> {
        self.queue()?.extend(jobs.iter().cloned());
        Ok(())
    }
}
