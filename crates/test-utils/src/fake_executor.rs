use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use taskfarm::engine::JobOutcome;
use taskfarm::exec::ExecutorBackend;

/// Shared log of `(job, outcome)` pairs, in execution order.
pub type ExecutionLog = Arc<Mutex<Vec<(String, JobOutcome)>>>;

/// A fake executor that:
/// - records every job it is asked to run
/// - returns scripted outcomes per job (falling back to a default)
///
/// Scripts are consumed front to back, so `[Failed(1), Success]` fails the
/// first attempt and succeeds on the second.
pub struct ScriptedExecutor {
    executed: ExecutionLog,
    scripts: HashMap<String, VecDeque<JobOutcome>>,
    default: JobOutcome,
}

impl ScriptedExecutor {
    pub fn new(executed: ExecutionLog) -> Self {
        Self {
            executed,
            scripts: HashMap::new(),
            default: JobOutcome::Success,
        }
    }

    /// Every job that has no script left ends in `outcome`.
    pub fn with_default(mut self, outcome: JobOutcome) -> Self {
        self.default = outcome;
        self
    }

    pub fn with_script(mut self, job: &str, outcomes: &[JobOutcome]) -> Self {
        self.scripts
            .insert(job.to_string(), outcomes.iter().copied().collect());
        self
    }
}

impl ExecutorBackend for ScriptedExecutor {
    fn run_job<'a>(
        &'a mut self,
        job: &'a str,
    ) -> Pin<Box<dyn Future<Output = JobOutcome> + Send + 'a>> {
        let outcome = self
            .scripts
            .get_mut(job)
            .and_then(VecDeque::pop_front)
            .unwrap_or(self.default);

        self.executed
            .lock()
            .unwrap()
            .push((job.to_string(), outcome));

        Box::pin(async move { outcome })
    }
}

/// Wraps another executor and records what it ran and how it ended.
pub struct RecordingExecutor<E> {
    inner: E,
    executed: ExecutionLog,
}

impl<E: ExecutorBackend> RecordingExecutor<E> {
    pub fn new(inner: E, executed: ExecutionLog) -> Self {
        Self { inner, executed }
    }
}

impl<E: ExecutorBackend> ExecutorBackend for RecordingExecutor<E> {
    fn run_job<'a>(
        &'a mut self,
        job: &'a str,
    ) -> Pin<Box<dyn Future<Output = JobOutcome> + Send + 'a>> {
        let executed = Arc::clone(&self.executed);
        Box::pin(async move {
            let outcome = self.inner.run_job(job).await;
            executed.lock().unwrap().push((job.to_string(), outcome));
            outcome
        })
    }
}

/// Jobs from an execution log, in order.
pub fn executed_jobs(log: &ExecutionLog) -> Vec<String> {
    log.lock().unwrap().iter().map(|(job, _)| job.clone()).collect()
}
