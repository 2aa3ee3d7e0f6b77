// src/policy/denylist.rs

//! Word-match denylist policy.
//!
//! A disallowed command `cmd` matches when the job starts with `"cmd "` or
//! contains `" cmd "`. This is a substring test, not a shell parse: it
//! misses `rm\t-rf`, `/bin/rm x`, `;rm x` and a trailing `rm`, and it
//! matches quoted arguments such as `echo " rm "`. Existing job files rely
//! on exactly this behaviour, so keep it.

use super::{CommandPolicy, Rejection, Verdict};

/// Denylist used when none is configured.
pub const DEFAULT_DISALLOWED: &[&str] = &["rm"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenylistPolicy {
    disallowed: Vec<String>,
}

impl DenylistPolicy {
    pub fn new<I, S>(disallowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            disallowed: disallowed.into_iter().map(Into::into).collect(),
        }
    }

    pub fn disallowed(&self) -> &[String] {
        &self.disallowed
    }

    fn find_disallowed(&self, job: &str) -> Option<&str> {
        self.disallowed
            .iter()
            .find(|cmd| {
                let leading = format!("{cmd} ");
                let inner = format!(" {cmd} ");
                job.starts_with(&leading) || job.contains(&inner)
            })
            .map(String::as_str)
    }
}

impl Default for DenylistPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DISALLOWED.iter().copied())
    }
}

impl CommandPolicy for DenylistPolicy {
    fn check(&self, job: &str) -> Verdict {
        if job.chars().all(char::is_whitespace) {
            return Verdict::Rejected(Rejection::Empty);
        }
        if job.contains('\0') {
            return Verdict::Rejected(Rejection::NullCharacter);
        }
        // Unreachable after the whitespace check; kept as its own rule.
        if job.is_empty() {
            return Verdict::Rejected(Rejection::ZeroLength);
        }
        if let Some(cmd) = self.find_disallowed(job) {
            return Verdict::Rejected(Rejection::Disallowed(cmd.to_string()));
        }
        Verdict::Allowed
    }
}
