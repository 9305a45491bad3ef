//! Read-only analytics over one account's records.
//!
//! Every function here is pure: it takes the records and a baseline view
//! and returns a value. Locking is the caller's concern.

use crate::baseline::BaselineLookup;
use crate::record::TransactionRecord;
use serde::{Deserialize, Serialize};

/// Tolerance over baseline still considered optimal, in percent.
pub const OPTIMAL_TOLERANCE_PERCENT: u128 = 110;

/// Highest efficiency score.
pub const MAX_EFFICIENCY_SCORE: u8 = 100;

/// Aggregate figures for one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasReport {
    /// Number of records.
    pub count: usize,
    /// Sum of `gas_used`.
    pub total_gas_consumed: u128,
    /// Sum of per-record cost.
    pub total_gas_cost: u128,
    /// Truncated mean of `gas_price`.
    pub average_gas_price: u64,
    /// Highest per-record cost.
    pub most_expensive_tx_cost: u128,
    /// Lowest per-record cost; `u128::MAX` when there are no records.
    pub cheapest_tx_cost: u128,
}

impl GasReport {
    /// Report for an account without records.
    pub const EMPTY: Self = Self {
        count: 0,
        total_gas_consumed: 0,
        total_gas_cost: 0,
        average_gas_price: 0,
        most_expensive_tx_cost: 0,
        cheapest_tx_cost: u128::MAX,
    };
}

/// Observed gas for one category against its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineComparison {
    /// Truncated mean `gas_used` of matching records.
    pub average_gas: u64,
    /// Current registry baseline.
    pub baseline: u64,
    /// Whether the average is within 110% of the baseline.
    pub is_optimal: bool,
}

/// Sum of `gas_used * gas_price`.
pub fn total_gas_cost(records: &[TransactionRecord]) -> u128 {
    records
        .iter()
        .fold(0u128, |total, record| total.saturating_add(record.cost()))
}

/// Aggregates in a single pass.
pub fn generate_report(records: &[TransactionRecord]) -> GasReport {
    if records.is_empty() {
        return GasReport::EMPTY;
    }

    let mut report = GasReport::EMPTY;
    let mut total_gas_price = 0u128;

    for record in records {
        let cost = record.cost();
        report.total_gas_consumed += u128::from(record.gas_used);
        report.total_gas_cost = report.total_gas_cost.saturating_add(cost);
        total_gas_price += u128::from(record.gas_price);
        report.most_expensive_tx_cost = report.most_expensive_tx_cost.max(cost);
        report.cheapest_tx_cost = report.cheapest_tx_cost.min(cost);
    }

    report.count = records.len();
    report.average_gas_price = mean(total_gas_price, records.len());
    report
}

/// Mean `gas_used` of records tagged exactly `category`, against `baseline`.
pub fn compare_against_baseline(
    records: &[TransactionRecord],
    category: &str,
    baseline: u64,
) -> BaselineComparison {
    let (total, matched) = records
        .iter()
        .filter(|record| record.category == category)
        .fold((0u128, 0usize), |(total, matched), record| {
            (total + u128::from(record.gas_used), matched + 1)
        });

    if matched == 0 {
        return BaselineComparison {
            average_gas: 0,
            baseline,
            is_optimal: false,
        };
    }

    let average_gas = mean(total, matched);
    let threshold = u128::from(baseline) * OPTIMAL_TOLERANCE_PERCENT / 100;
    BaselineComparison {
        average_gas,
        baseline,
        is_optimal: u128::from(average_gas) <= threshold,
    }
}

/// Records with `start <= timestamp <= end`, in insertion order.
pub fn transactions_in_range(
    records: &[TransactionRecord],
    start: u64,
    end: u64,
) -> Vec<TransactionRecord> {
    if start > end {
        return Vec::new();
    }
    records
        .iter()
        .filter(|record| (start..=end).contains(&record.timestamp))
        .cloned()
        .collect()
}

/// Score of one record, or `None` when it cannot be scored.
///
/// Records without a baseline are unscored, and so are records with
/// `gas_used == 0`, which have no meaningful ratio.
pub fn record_efficiency(record: &TransactionRecord, baseline: u64) -> Option<u8> {
    if baseline == 0 || record.gas_used == 0 {
        return None;
    }
    let ratio = u128::from(baseline) * 100 / u128::from(record.gas_used);
    let capped = ratio.min(u128::from(MAX_EFFICIENCY_SCORE));
    u8::try_from(capped).ok()
}

/// Mean per-record score over scored records, in `[0, 100]`; 0 when none scored.
pub fn efficiency_score<B: BaselineLookup + ?Sized>(
    records: &[TransactionRecord],
    baselines: &B,
) -> u8 {
    let (total, scored) = records
        .iter()
        .filter_map(|record| record_efficiency(record, baselines.baseline(&record.category)))
        .fold((0u128, 0usize), |(total, scored), score| {
            (total + u128::from(score), scored + 1)
        });

    if scored == 0 {
        return 0;
    }
    u8::try_from(total / scored as u128).unwrap_or(MAX_EFFICIENCY_SCORE)
}

/// Sum of `(gas_used - baseline) * gas_price` over records above their baseline.
pub fn estimate_max_potential_savings<B: BaselineLookup + ?Sized>(
    records: &[TransactionRecord],
    baselines: &B,
) -> u128 {
    records
        .iter()
        .filter_map(|record| {
            let baseline = baselines.baseline(&record.category);
            if baseline == 0 || record.gas_used <= baseline {
                return None;
            }
            let excess = u128::from(record.gas_used - baseline);
            Some(excess * u128::from(record.gas_price))
        })
        .fold(0u128, u128::saturating_add)
}

/// Truncated mean of `total` over `count` items; callers guarantee `count > 0`.
pub(crate) fn mean(total: u128, count: usize) -> u64 {
    u64::try_from(total / count as u128).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::TransactionDraft;
    use gasopt_config::default_baselines;
    use gasopt_primitives::Address;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn record(gas_used: u64, gas_price: u64, category: &str, timestamp: u64) -> TransactionRecord {
        TransactionDraft::new(Address::from_low_u64(2), 0, gas_used, gas_price, category)
            .into_record(Address::from_low_u64(1), timestamp)
    }

    #[test]
    fn test_empty_report_keeps_sentinel() {
        let report = generate_report(&[]);
        assert_eq!(report.count, 0);
        assert_eq!(report.total_gas_consumed, 0);
        assert_eq!(report.total_gas_cost, 0);
        assert_eq!(report.average_gas_price, 0);
        assert_eq!(report.most_expensive_tx_cost, 0);
        assert_eq!(report.cheapest_tx_cost, u128::MAX);
        assert_eq!(total_gas_cost(&[]), 0);
    }

    #[test]
    fn test_report_round_trip() {
        let records = vec![
            record(10, 1, "transfer", 0),
            record(20, 1, "transfer", 0),
            record(30, 1, "transfer", 0),
        ];
        let report = generate_report(&records);
        assert_eq!(total_gas_cost(&records), 60);
        assert_eq!(report.count, 3);
        assert_eq!(report.total_gas_consumed, 60);
        assert_eq!(report.total_gas_cost, 60);
        assert_eq!(report.average_gas_price, 1);
        assert_eq!(report.most_expensive_tx_cost, 30);
        assert_eq!(report.cheapest_tx_cost, 10);
    }

    #[test]
    fn test_average_gas_price_truncates() {
        let records = vec![record(1, 1, "x", 0), record(1, 2, "x", 0)];
        assert_eq!(generate_report(&records).average_gas_price, 1);
    }

    #[test]
    fn test_free_transaction_is_cheapest() {
        let records = vec![record(0, 5, "x", 0), record(10, 5, "x", 0)];
        assert_eq!(generate_report(&records).cheapest_tx_cost, 0);
    }

    #[test]
    fn test_compare_without_matches() {
        let records = vec![record(30_000, 1, "contract_call", 0)];
        let comparison = compare_against_baseline(&records, "transfer", 21_000);
        assert_eq!(
            comparison,
            BaselineComparison {
                average_gas: 0,
                baseline: 21_000,
                is_optimal: false
            }
        );
    }

    #[test]
    fn test_compare_tolerance_boundary() {
        // 21000 * 110 / 100 = 23100
        let at_limit = vec![record(23_100, 1, "transfer", 0)];
        assert!(compare_against_baseline(&at_limit, "transfer", 21_000).is_optimal);

        let over = vec![record(23_101, 1, "transfer", 0)];
        assert!(!compare_against_baseline(&over, "transfer", 21_000).is_optimal);
    }

    #[test]
    fn test_compare_averages_only_matching() {
        let records = vec![
            record(20_000, 1, "transfer", 0),
            record(900_000, 1, "deployment", 0),
            record(22_001, 1, "transfer", 0),
        ];
        let comparison = compare_against_baseline(&records, "transfer", 21_000);
        assert_eq!(comparison.average_gas, 21_000);
        assert!(comparison.is_optimal);
    }

    #[test]
    fn test_range_is_inclusive_and_ordered() {
        let records = vec![
            record(1, 1, "x", 100),
            record(2, 1, "x", 300),
            record(3, 1, "x", 200),
            record(4, 1, "x", 400),
        ];
        let hits: Vec<u64> = transactions_in_range(&records, 200, 300)
            .iter()
            .map(|r| r.gas_used)
            .collect();
        assert_eq!(hits, vec![2, 3]);
    }

    #[test]
    fn test_range_inverted_or_empty() {
        let records = vec![record(1, 1, "x", 100)];
        assert!(transactions_in_range(&records, 200, 100).is_empty());
        assert!(transactions_in_range(&records, 101, 150).is_empty());
    }

    #[test]
    fn test_efficiency_single_record() {
        let baselines = default_baselines();
        assert_eq!(efficiency_score(&[record(21_000, 1, "transfer", 0)], &baselines), 100);
        assert_eq!(efficiency_score(&[record(42_000, 1, "transfer", 0)], &baselines), 50);
        assert_eq!(efficiency_score(&[record(10_500, 1, "transfer", 0)], &baselines), 100);
    }

    #[test]
    fn test_efficiency_ignores_unscored_records() {
        let baselines = default_baselines();
        let records = vec![
            record(42_000, 1, "transfer", 0),
            record(1, 1, "unknown", 0),
            record(0, 1, "transfer", 0),
        ];
        assert_eq!(efficiency_score(&records, &baselines), 50);
        assert_eq!(efficiency_score(&records[1..], &baselines), 0);
        assert_eq!(efficiency_score(&[], &baselines), 0);
    }

    #[test]
    fn test_efficiency_averages_scores() {
        let baselines = default_baselines();
        let records = vec![
            record(21_000, 1, "transfer", 0),
            record(100_000, 1, "contract_call", 0),
        ];
        // (100 + 50) / 2
        assert_eq!(efficiency_score(&records, &baselines), 75);
    }

    #[test]
    fn test_potential_savings() {
        let baselines = default_baselines();
        let records = vec![
            record(25_000, 3, "transfer", 0),
            record(20_000, 3, "transfer", 0),
            record(80_000, 2, "contract_call", 0),
            record(999_999, 9, "unknown", 0),
        ];
        // 4000 * 3 + 30000 * 2
        assert_eq!(estimate_max_potential_savings(&records, &baselines), 72_000);
        assert_eq!(estimate_max_potential_savings(&records, &BTreeMap::new()), 0);
    }

    proptest! {
        #[test]
        fn efficiency_stays_in_bounds(
            gas in proptest::collection::vec(0u64..1_000_000, 0..20),
            baseline in 0u64..500_000,
        ) {
            let baselines = BTreeMap::from([("transfer".to_string(), baseline)]);
            let records: Vec<_> = gas.iter().map(|g| record(*g, 1, "transfer", 0)).collect();
            prop_assert!(efficiency_score(&records, &baselines) <= MAX_EFFICIENCY_SCORE);
        }

        #[test]
        fn report_extremes_bracket_every_cost(
            costs in proptest::collection::vec((0u64..1_000_000, 0u64..1_000), 1..20),
        ) {
            let records: Vec<_> = costs.iter().map(|(g, p)| record(*g, *p, "x", 0)).collect();
            let report = generate_report(&records);
            for r in &records {
                prop_assert!(report.cheapest_tx_cost <= r.cost());
                prop_assert!(report.most_expensive_tx_cost >= r.cost());
            }
            prop_assert_eq!(report.total_gas_cost, total_gas_cost(&records));
        }
    }
}
