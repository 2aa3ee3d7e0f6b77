// src/types.rs

use std::time::Duration;

/// What a worker does when it finds the job store empty.
///
/// - `Wait`: sleep for the interval, then check the store again. The store
///   may have been extended externally in the meantime.
/// - `Exit`: terminate the worker normally (default behaviour).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdlePolicy {
    Wait(Duration),
    #[default]
    Exit,
}

impl IdlePolicy {
    pub fn from_flags(wait_on_idle: bool, sleep: Duration) -> Self {
        if wait_on_idle {
            IdlePolicy::Wait(sleep)
        } else {
            IdlePolicy::Exit
        }
    }
}
