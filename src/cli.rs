// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Short and long flags follow the classic task farmer interface, so
//! existing launch scripts keep working:
//!
//! `mpirun -np CORES taskfarm -f FILE [-v] [-w] [-r] [-s SLEEP_TIME] [-m MAX_RETRIES] [-d [DISALLOWED ...]]`

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `taskfarm`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "taskfarm",
    version,
    about = "A simple task farmer for running serial jobs with mpirun.",
    long_about = "Each worker process repeatedly pops the first line off a shared job file \
                  (under an exclusive file lock) and runs it as a shell command. Launch one \
                  worker per core; no coordinator process is needed."
)]
pub struct CliArgs {
    /// Location of the job file (one shell command per line).
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Enable verbose mode (status updates to stdout).
    #[arg(short, long)]
    pub verbose: bool,

    /// Wait for more jobs when the job file is empty, instead of exiting.
    #[arg(short, long)]
    pub wait_on_idle: bool,

    /// Retry failed jobs.
    #[arg(short, long)]
    pub retry: bool,

    /// Sleep duration when idle (seconds). Default: 300.
    #[arg(
        short,
        long,
        value_name = "SLEEP_TIME",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub sleep_time: Option<u64>,

    /// Maximum number of attempts for a failed job when retrying. Default: 10.
    #[arg(
        short,
        long,
        value_name = "MAX_RETRIES",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_retries: Option<u32>,

    /// Disallowed commands. Default: rm. Pass `-d` with no values to allow
    /// everything.
    #[arg(short, long, value_name = "DISALLOWED", num_args = 0..)]
    pub disallowed: Option<Vec<String>>,

    /// Optional TOML config file with a `[worker]` table.
    ///
    /// Flags given on the command line override values from the file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Worker rank used in log lines.
    ///
    /// If omitted, the rank is read from the launcher environment
    /// (`OMPI_COMM_WORLD_RANK`, `PMI_RANK`, `PMIX_RANK`, `SLURM_PROCID`,
    /// `MV2_COMM_WORLD_RANK`), falling back to 0.
    #[arg(long, value_name = "N")]
    pub rank: Option<u32>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKFARM_LOG` is used, then `info` with `--verbose` and
    /// `warn` without.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the effective configuration and pending jobs without claiming
    /// or running anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
