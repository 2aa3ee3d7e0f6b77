// src/store/mod.rs

//! The shared job store.
//!
//! A job store is a line-oriented text file on storage that every worker can
//! see. Line order is queue order: the first line is the next job claimed.
//!
//! - [`gate`] holds the exclusive advisory lock that serialises access.
//! - [`FileJobStore`] implements the claim transaction on top of it.
//! - [`mock`] provides an in-memory store for exercising the worker loop
//!   without a filesystem.

use std::fmt::Debug;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use tracing::debug;

use crate::errors::{Result, TaskfarmError};

pub mod gate;
pub mod mock;

pub use gate::GateGuard;
pub use mock::MemoryJobStore;

/// A single job: one shell command line, without its line terminator.
pub type Job = String;

/// Result of one claim transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// The front line of the store, now removed from it.
    Job(Job),
    /// The front line was removed but is not valid UTF-8, so it must not be
    /// run. Carries a lossy rendering for logging.
    Undecodable(Job),
    /// The store held no lines; nothing was modified.
    Empty,
}

/// Abstract job queue shared between workers.
///
/// Every method is one self-contained transaction. Implementations must make
/// `claim` linearizable across all workers sharing the store.
pub trait JobStore: Send + Sync + Debug {
    /// Atomically pop the front job.
    fn claim(&self) -> Result<Claim>;

    /// Read the remaining jobs without modifying the store.
    fn pending(&self) -> Result<Vec<Job>>;

    /// Append jobs to the back of the store.
    fn append(&self, jobs: &[Job]) -> Result<()>;
}

/// Job store backed by a file guarded by an advisory lock.
///
/// The file is reopened for every transaction, so external tooling can
/// replace or extend it between claims.
#[derive(Debug, Clone)]
pub struct FileJobStore {
    path: PathBuf,
}

impl FileJobStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn open(&self) -> Result<File> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => TaskfarmError::StoreNotFound(self.path.clone()),
                _ => TaskfarmError::IoError(e),
            })
    }

    fn lock(&self) -> Result<GateGuard> {
        let file = self.open()?;
        GateGuard::acquire(file, &self.path)
    }
}

impl JobStore for FileJobStore {
    fn claim(&self) -> Result<Claim> {
        let mut gate = self.lock()?;

        let mut contents = Vec::new();
        gate.file_mut().read_to_end(&mut contents)?;

        let Some((claim, rest)) = split_first_line(&contents) else {
            gate.release()?;
            debug!(path = %self.path.display(), "job file empty; nothing claimed");
            return Ok(Claim::Empty);
        };

        // Rewrite the remainder before anyone else can observe the file.
        let file = gate.file_mut();
        file.seek(SeekFrom::Start(0))?;
        file.set_len(0)?;
        file.write_all(rest)?;
        file.flush()?;
        file.sync_data()?;

        gate.release()?;

        debug!(
            path = %self.path.display(),
            ?claim,
            remaining_bytes = rest.len(),
            "claimed job"
        );
        Ok(claim)
    }

    fn pending(&self) -> Result<Vec<Job>> {
        let mut gate = self.lock()?;

        let mut contents = Vec::new();
        gate.file_mut().read_to_end(&mut contents)?;
        gate.release()?;

        Ok(split_lines(&contents))
    }

    fn append(&self, jobs: &[Job]) -> Result<()> {
        if jobs.is_empty() {
            return Ok(());
        }

        let mut gate = self.lock()?;
        let file = gate.file_mut();

        let len = file.seek(SeekFrom::End(0))?;
        let mut buf = Vec::new();
        if len > 0 {
            // Never glue the first new job onto an unterminated last line.
            file.seek(SeekFrom::End(-1))?;
            let mut last = [0u8; 1];
            file.read_exact(&mut last)?;
            if last[0] != b'\n' {
                buf.push(b'\n');
            }
        }
        for job in jobs {
            buf.extend_from_slice(job.as_bytes());
            buf.push(b'\n');
        }

        file.seek(SeekFrom::End(0))?;
        file.write_all(&buf)?;
        file.flush()?;
        file.sync_data()?;

        gate.release()?;

        debug!(path = %self.path.display(), count = jobs.len(), "appended jobs");
        Ok(())
    }
}

/// Split raw store contents into the front claim and the untouched remainder.
///
/// Returns `None` only for zero-length contents. A lone `"\n"` yields an
/// empty job, which the command policy then rejects.
pub fn split_first_line(contents: &[u8]) -> Option<(Claim, &[u8])> {
    let (line, rest) = split_raw(contents)?;
    Some((decode_line(line), rest))
}

/// Split raw store contents into jobs, in order.
///
/// Lines that are not valid UTF-8 are rendered lossily; this is for display
/// only and never feeds execution.
pub fn split_lines(contents: &[u8]) -> Vec<Job> {
    let mut jobs = Vec::new();
    let mut rest = contents;
    while let Some((line, tail)) = split_raw(rest) {
        jobs.push(String::from_utf8_lossy(strip_cr(line)).into_owned());
        rest = tail;
    }
    jobs
}

fn split_raw(contents: &[u8]) -> Option<(&[u8], &[u8])> {
    if contents.is_empty() {
        return None;
    }

    Some(match contents.iter().position(|&b| b == b'\n') {
        Some(idx) => (&contents[..idx], &contents[idx + 1..]),
        None => (contents, &contents[contents.len()..]),
    })
}

fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn decode_line(line: &[u8]) -> Claim {
    let line = strip_cr(line);
    match std::str::from_utf8(line) {
        Ok(text) => Claim::Job(text.to_owned()),
        Err(_) => Claim::Undecodable(String::from_utf8_lossy(line).into_owned()),
    }
}
