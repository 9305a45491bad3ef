//! Category baseline registry.
//!
//! Maps a category tag to the gas a typical transaction of that kind
//! should consume. A category with no entry has baseline zero and is left
//! out of every baseline-relative computation.

use gasopt_config::default_baselines;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Read access to category baselines.
pub trait BaselineLookup {
    /// Baseline for `category`, or 0 when none is registered.
    fn baseline(&self, category: &str) -> u64;
}

impl BaselineLookup for BTreeMap<String, u64> {
    fn baseline(&self, category: &str) -> u64 {
        self.get(category).copied().unwrap_or(0)
    }
}

/// Mutable baseline table shared by every analytic.
#[derive(Debug)]
pub struct BaselineRegistry {
    baselines: RwLock<BTreeMap<String, u64>>,
}

impl BaselineRegistry {
    /// Creates a registry seeded with the default categories.
    pub fn new() -> Self {
        Self::with_baselines(default_baselines())
    }

    /// Creates a registry holding exactly `baselines`.
    pub fn with_baselines(baselines: BTreeMap<String, u64>) -> Self {
        Self {
            baselines: RwLock::new(baselines),
        }
    }

    /// Baseline for `category` (0 if absent).
    pub fn get(&self, category: &str) -> u64 {
        self.baselines.read().baseline(category)
    }

    /// Stores `value` for `category`, returning the previous baseline (0 if absent).
    ///
    /// Authorization is checked by the caller.
    pub(crate) fn set(&self, category: &str, value: u64) -> u64 {
        self.baselines
            .write()
            .insert(category.to_string(), value)
            .unwrap_or(0)
    }

    /// Copy of every registered baseline, ordered by category.
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.baselines.read().clone()
    }
}

impl Default for BaselineRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BaselineLookup for BaselineRegistry {
    fn baseline(&self, category: &str) -> u64 {
        self.get(category)
    }
}
