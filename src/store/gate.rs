// src/store/gate.rs

//! The mutual-exclusion gate around the job file.
//!
//! The gate is an exclusive advisory lock (`flock(LOCK_EX)` on Unix,
//! `LockFileEx` on Windows) taken on the job file's own handle. Acquisition
//! blocks until every other holder has released it; there is no polling.
//!
//! Advisory locks only work if every host sharing the file honours them.
//! Some network filesystems do not, and nothing here can detect that.

use std::fs::File;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{trace, warn};

use crate::errors::{Result, TaskfarmError};

/// An open job file whose exclusive lock is currently held.
///
/// Dropping the guard unlocks and closes the file, so an error half way
/// through a transaction never leaves the gate held.
#[derive(Debug)]
pub struct GateGuard {
    file: File,
    path: PathBuf,
    released: bool,
}

impl GateGuard {
    /// Block until the exclusive lock on `file` is held.
    pub fn acquire(file: File, path: &Path) -> Result<Self> {
        trace!(path = %path.display(), "acquiring job file lock");
        file.lock_exclusive()
            .map_err(|source| TaskfarmError::LockError {
                path: path.to_path_buf(),
                source,
            })?;
        trace!(path = %path.display(), "job file lock acquired");

        Ok(Self {
            file,
            path: path.to_path_buf(),
            released: false,
        })
    }

    pub fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }

    /// Unlock explicitly so unlock failures are reported to the caller.
    ///
    /// Callers must have flushed everything they wrote before releasing.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        FileExt::unlock(&self.file).map_err(|source| TaskfarmError::LockError {
            path: self.path.clone(),
            source,
        })?;
        trace!(path = %self.path.display(), "job file lock released");
        Ok(())
    }
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = FileExt::unlock(&self.file) {
            // Closing the handle below drops the lock anyway.
            warn!(path = %self.path.display(), error = %e, "failed to unlock job file on drop");
        }
    }
}
