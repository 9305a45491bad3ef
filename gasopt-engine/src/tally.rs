//! Caller-reported optimization savings.
//!
//! These counters are fed only by explicit reports and are independent of
//! ledger content.

use crate::error::{AnalyticsError, AnalyticsResult};
use dashmap::DashMap;
use gasopt_primitives::Address;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Savings figures for one account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsStats {
    /// Cumulative savings reported by the account.
    pub total_saved: u128,
    /// Reports received from all accounts.
    pub global_optimization_count: u64,
}

/// Per-account savings counters plus a global report counter.
#[derive(Debug, Default)]
pub struct OptimizationTally {
    saved: DashMap<Address, u128>,
    optimizations: AtomicU64,
}

impl OptimizationTally {
    /// Creates an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to `account` and counts one optimization.
    ///
    /// Returns the account's new cumulative savings.
    pub fn report_savings(&self, account: Address, amount: u128) -> AnalyticsResult<u128> {
        if amount == 0 {
            return Err(AnalyticsError::invalid_amount("savings"));
        }
        let total = {
            let mut entry = self.saved.entry(account).or_insert(0);
            let updated = entry.saturating_add(amount);
            *entry = updated;
            updated
        };
        self.optimizations.fetch_add(1, Ordering::SeqCst);
        Ok(total)
    }

    /// Savings for `account` and the global count.
    pub fn stats(&self, account: &Address) -> SavingsStats {
        SavingsStats {
            total_saved: self.saved.get(account).map(|e| *e.value()).unwrap_or(0),
            global_optimization_count: self.optimizations.load(Ordering::SeqCst),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_zero_savings_rejected() {
        let tally = OptimizationTally::new();
        let account = Address::from_low_u64(1);
        assert_eq!(
            tally.report_savings(account, 0),
            Err(AnalyticsError::invalid_amount("savings"))
        );
        assert_eq!(tally.stats(&account), SavingsStats::default());
    }

    #[test]
    fn test_accumulates_per_account() {
        let tally = OptimizationTally::new();
        let a = Address::from_low_u64(1);
        let b = Address::from_low_u64(2);

        assert_eq!(tally.report_savings(a, 100).unwrap(), 100);
        assert_eq!(tally.report_savings(a, 50).unwrap(), 150);
        assert_eq!(tally.report_savings(b, 7).unwrap(), 7);

        assert_eq!(
            tally.stats(&a),
            SavingsStats {
                total_saved: 150,
                global_optimization_count: 3
            }
        );
        assert_eq!(tally.stats(&b).total_saved, 7);
        assert_eq!(tally.stats(&Address::from_low_u64(3)).global_optimization_count, 3);
    }

    #[test]
    fn test_concurrent_reports() {
        let tally = Arc::new(OptimizationTally::new());
        let account = Address::from_low_u64(1);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tally = Arc::clone(&tally);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        tally.report_savings(account, 1).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = tally.stats(&account);
        assert_eq!(stats.total_saved, 800);
        assert_eq!(stats.global_optimization_count, 800);
    }
}
