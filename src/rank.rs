// src/rank.rs

//! Worker identity.
//!
//! The rank comes from the parallel launcher and only labels log output;
//! nothing in the claim protocol depends on it.

use std::fmt;

/// Environment variables set by common launchers, in lookup order.
pub const RANK_ENV_VARS: &[&str] = &[
    "OMPI_COMM_WORLD_RANK",
    "PMI_RANK",
    "PMIX_RANK",
    "SLURM_PROCID",
    "MV2_COMM_WORLD_RANK",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rank(pub u32);

impl Rank {
    /// Pick the rank from an explicit value, then the launcher environment,
    /// then fall back to 0.
    pub fn resolve(explicit: Option<u32>) -> Self {
        explicit
            .map(Rank)
            .or_else(|| Self::from_env_with(|key| std::env::var(key).ok()))
            .unwrap_or_default()
    }

    /// First parseable rank among [`RANK_ENV_VARS`], using `lookup` to read
    /// variables.
    pub fn from_env_with<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        RANK_ENV_VARS
            .iter()
            .filter_map(|key| lookup(key))
            .find_map(|value| value.trim().parse().ok())
            .map(Rank)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}
