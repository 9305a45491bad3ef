//! Gas limit recommendations from an account's history.

use crate::record::TransactionRecord;
use crate::report::mean;
use serde::{Deserialize, Serialize};

/// Headroom added on top of the average, in percent.
pub const GAS_LIMIT_HEADROOM_PERCENT: u128 = 20;

/// Suggested gas limit and the savings it would have yielded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasRecommendation {
    /// Truncated mean `gas_used`.
    pub average_gas_used: u64,
    /// Average plus 20% headroom.
    pub recommended_gas_limit: u64,
    /// Largest excess over the recommendation times the record count.
    pub potential_savings: u128,
    /// Number of records considered.
    pub transaction_count: usize,
    /// False when there was no history to learn from.
    pub has_recommendation: bool,
}

/// Builds a recommendation from `records`.
///
/// `potential_savings` multiplies the single worst excess by the number of
/// records rather than summing per-record excess.
pub fn recommend(records: &[TransactionRecord]) -> GasRecommendation {
    if records.is_empty() {
        return GasRecommendation::default();
    }

    let (total_gas, max_gas) = records.iter().fold((0u128, 0u64), |(total, max), record| {
        (total + u128::from(record.gas_used), max.max(record.gas_used))
    });

    let average_gas_used = mean(total_gas, records.len());
    let average = u128::from(average_gas_used);
    let recommended = average + average * GAS_LIMIT_HEADROOM_PERCENT / 100;
    let recommended_gas_limit = u64::try_from(recommended).unwrap_or(u64::MAX);

    let potential_savings = if max_gas > recommended_gas_limit {
        u128::from(max_gas - recommended_gas_limit) * records.len() as u128
    } else {
        0
    };

    GasRecommendation {
        average_gas_used,
        recommended_gas_limit,
        potential_savings,
        transaction_count: records.len(),
        has_recommendation: true,
    }
}
