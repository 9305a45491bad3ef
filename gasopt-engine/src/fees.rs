//! Analysis fee configuration and withdrawal delegation.
//!
//! The engine only stores the configured fee. Moving funds is done by a
//! [`FeeSettlement`] supplied by the embedding layer.

use crate::error::AnalyticsResult;
use gasopt_primitives::Address;
use parking_lot::RwLock;

/// Moves collected fees on behalf of the administrator.
pub trait FeeSettlement: Send + Sync {
    /// Transfers every collected fee to `to` and returns the amount moved.
    fn withdraw(&self, to: &Address) -> AnalyticsResult<u128>;
}

/// Currently configured analysis fee.
#[derive(Debug, Default)]
pub struct FeeSchedule {
    fee: RwLock<u128>,
}

impl FeeSchedule {
    /// Creates a schedule starting at `fee`.
    pub fn new(fee: u128) -> Self {
        Self {
            fee: RwLock::new(fee),
        }
    }

    /// Current fee.
    pub fn fee(&self) -> u128 {
        *self.fee.read()
    }

    /// Replaces the fee, returning the previous one.
    pub(crate) fn set(&self, fee: u128) -> u128 {
        std::mem::replace(&mut *self.fee.write(), fee)
    }
}
