//! Advisory per-account spending ceilings.

use crate::error::{AnalyticsError, AnalyticsResult};
use dashmap::DashMap;
use gasopt_primitives::Address;
use tracing::warn;

/// A budget overrun found after an append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetOverrun {
    /// Cumulative gas cost of the account.
    pub spent: u128,
    /// Configured ceiling.
    pub budget: u128,
}

/// Tracks optional gas-cost ceilings. Never blocks an append.
#[derive(Debug, Default)]
pub struct BudgetMonitor {
    budgets: DashMap<Address, u128>,
}

impl BudgetMonitor {
    /// Creates a monitor with no budgets configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `account`'s ceiling, replacing any previous one.
    pub fn set_budget(&self, account: Address, amount: u128) -> AnalyticsResult<()> {
        if amount == 0 {
            return Err(AnalyticsError::invalid_amount("budget"));
        }
        self.budgets.insert(account, amount);
        Ok(())
    }

    /// Configured ceiling for `account`, if any.
    pub fn budget(&self, account: &Address) -> Option<u128> {
        self.budgets.get(account).map(|entry| *entry.value())
    }

    /// Compares `spent` with `account`'s ceiling.
    ///
    /// Returns the overrun when `spent` is strictly above the budget.
    pub fn check_after_append(&self, account: &Address, spent: u128) -> Option<BudgetOverrun> {
        let budget = self.budget(account)?;
        if spent <= budget {
            return None;
        }
        warn!(%account, spent, budget, "gas budget exceeded");
        Some(BudgetOverrun { spent, budget })
    }
}
