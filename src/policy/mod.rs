// src/policy/mod.rs

//! Command policy: decides whether a claimed job may be executed.
//!
//! The policy runs after the job file lock has been released, on the worker
//! that claimed the job. It guards execution, not coordination. A rejected
//! job is discarded; it is never written back or retried.
//!
//! [`CommandPolicy`] is the seam for swapping in a stricter checker;
//! [`DenylistPolicy`] is the coarse word-match implementation used by
//! default.

use std::fmt;

pub mod denylist;

pub use denylist::DenylistPolicy;

/// Why a job was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Only whitespace (including the empty string).
    Empty,
    NullCharacter,
    ZeroLength,
    /// Contains the named disallowed command.
    Disallowed(String),
    /// The line in the job file is not valid UTF-8.
    InvalidEncoding,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Empty => f.write_str("empty"),
            Rejection::NullCharacter => f.write_str("null character present"),
            Rejection::ZeroLength => f.write_str("zero length"),
            Rejection::Disallowed(cmd) => write!(f, "{cmd} found"),
            Rejection::InvalidEncoding => f.write_str("invalid UTF-8"),
        }
    }
}

/// Outcome of checking a job against a policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allowed)
    }

    /// Flatten into `(allowed, reason)`.
    pub fn into_pair(self) -> (bool, String) {
        match self {
            Verdict::Allowed => (true, "no error".to_string()),
            Verdict::Rejected(r) => (false, r.to_string()),
        }
    }
}

/// A predicate over job strings.
///
/// Implementations must be pure: no IO and no state changes.
pub trait CommandPolicy: Send + Sync + fmt::Debug {
    fn check(&self, job: &str) -> Verdict;
}

/// Convenience wrapper returning the `(allowed, reason)` pair.
pub fn is_allowed(policy: &dyn CommandPolicy, job: &str) -> (bool, String) {
    policy.check(job).into_pair()
}
