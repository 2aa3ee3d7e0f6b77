// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod policy;
pub mod rank;
pub mod store;
pub mod types;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::WorkerConfig;
use crate::engine::{Worker, WorkerCore, WorkerSummary};
use crate::exec::ShellExecutor;
use crate::rank::Rank;
use crate::store::{FileJobStore, JobStore};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - rank resolution
/// - the file-backed job store
/// - the worker core (policy, retry bound, idle policy)
/// - the shell executor
pub async fn run(args: CliArgs, cfg: WorkerConfig) -> Result<()> {
    let rank = Rank::resolve(args.rank);
    let store = FileJobStore::new(&cfg.store_path);

    if args.dry_run {
        print_dry_run(rank, &cfg, &store)?;
        return Ok(());
    }

    run_worker(rank, &cfg, store, ShellExecutor::new()).await?;
    Ok(())
}

/// Run a single worker to completion against `store`.
pub async fn run_worker<S, E>(
    rank: Rank,
    cfg: &WorkerConfig,
    store: S,
    executor: E,
) -> Result<WorkerSummary>
where
    S: JobStore + 'static,
    E: exec::ExecutorBackend,
{
    info!(
        rank = %rank,
        file = %cfg.store_path.display(),
        wait_on_idle = cfg.wait_on_idle,
        sleep_secs = cfg.sleep_seconds,
        max_attempts = cfg.max_attempts(),
        disallowed = ?cfg.disallowed_commands,
        "worker starting"
    );

    let core = WorkerCore::from_config(cfg);
    let worker = Worker::new(rank, core, store, executor);
    let summary = worker
        .run()
        .await
        .with_context(|| format!("worker rank {rank} stopped"))?;
    Ok(summary)
}

/// Dry-run output: effective config and the jobs still in the file.
fn print_dry_run(rank: Rank, cfg: &WorkerConfig, store: &FileJobStore) -> Result<()> {
    let pending = store
        .pending()
        .with_context(|| format!("reading job file {}", cfg.store_path.display()))?;

    println!("taskfarm dry-run (rank {rank})");
    println!("  file = {}", cfg.store_path.display());
    println!("  wait_on_idle = {}", cfg.wait_on_idle);
    println!("  sleep_seconds = {}", cfg.sleep_seconds);
    println!("  retry = {}", cfg.retry);
    println!("  max_attempts = {}", cfg.max_attempts());
    println!("  disallowed = {:?}", cfg.disallowed_commands);
    println!();

    let policy = cfg.command_policy();
    println!("pending jobs ({}):", pending.len());
    for job in &pending {
        let (allowed, reason) = policy::is_allowed(&policy, job);
        if allowed {
            println!("  - {job}");
        } else {
            println!("  - {job}    [rejected: {reason}]");
        }
    }

    debug!("dry-run complete (no claims)");
    Ok(())
}
