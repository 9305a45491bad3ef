//! The analytics engine facade.
//!
//! [`GasAnalytics`] owns the ledger, the baseline registry, budgets, the
//! savings tally and the fee schedule, and wires them to an administrator
//! policy, a clock and a notification sink. All methods take `&self`; the
//! engine can be shared behind an `Arc`.

use crate::auth::{AdminPolicy, NoAdministrator, SingleAdministrator};
use crate::baseline::BaselineRegistry;
use crate::budget::BudgetMonitor;
use crate::clock::{SystemClock, TimeSource};
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::events::{Notification, NotificationLog, NotificationSink};
use crate::fees::{FeeSchedule, FeeSettlement};
use crate::ledger::TransactionLedger;
use crate::recommend::{self, GasRecommendation};
use crate::record::{TransactionDraft, TransactionRecord};
use crate::report::{self, BaselineComparison, GasReport};
use crate::tally::{OptimizationTally, SavingsStats};
use gasopt_config::{default_baselines, AnalyticsSettings};
use gasopt_primitives::Address;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Builder for [`GasAnalytics`].
pub struct GasAnalyticsBuilder {
    baselines: BTreeMap<String, u64>,
    analysis_fee: u128,
    admin: Arc<dyn AdminPolicy>,
    clock: Arc<dyn TimeSource>,
    sink: Arc<dyn NotificationSink>,
}

impl GasAnalyticsBuilder {
    /// Starts from default baselines, no administrator, the system clock and
    /// a private [`NotificationLog`].
    pub fn new() -> Self {
        Self {
            baselines: default_baselines(),
            analysis_fee: 0,
            admin: Arc::new(NoAdministrator),
            clock: Arc::new(SystemClock),
            sink: Arc::new(NotificationLog::new()),
        }
    }

    /// Applies baselines, administrator and fee from `settings`.
    pub fn settings(mut self, settings: &AnalyticsSettings) -> Self {
        self.baselines = settings.baselines.clone();
        self.analysis_fee = u128::from(settings.analysis_fee);
        self.admin = match settings.administrator {
            Some(admin) => Arc::new(SingleAdministrator::new(admin)),
            None => Arc::new(NoAdministrator),
        };
        self
    }

    /// Replaces the whole baseline table.
    pub fn baselines(mut self, baselines: BTreeMap<String, u64>) -> Self {
        self.baselines = baselines;
        self
    }

    /// Sets the initial analysis fee.
    pub fn analysis_fee(mut self, fee: u128) -> Self {
        self.analysis_fee = fee;
        self
    }

    /// Sets the administrator policy.
    pub fn admin_policy(mut self, admin: Arc<dyn AdminPolicy>) -> Self {
        self.admin = admin;
        self
    }

    /// Sets the clock used to stamp records.
    pub fn clock(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets where notifications go.
    ///
    /// Append notifications are published while the account's lock is
    /// held. The sink must not call back into the engine, or it can
    /// deadlock against a queued writer.
    pub fn sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Builds the engine.
    pub fn build(self) -> GasAnalytics {
        GasAnalytics {
            ledger: TransactionLedger::new(),
            baselines: BaselineRegistry::with_baselines(self.baselines),
            budgets: BudgetMonitor::new(),
            tally: OptimizationTally::new(),
            fees: FeeSchedule::new(self.analysis_fee),
            admin: self.admin,
            clock: self.clock,
            sink: self.sink,
        }
    }
}

impl Default for GasAnalyticsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Transaction ledger plus the analytics derived from it.
pub struct GasAnalytics {
    ledger: TransactionLedger,
    baselines: BaselineRegistry,
    budgets: BudgetMonitor,
    tally: OptimizationTally,
    fees: FeeSchedule,
    admin: Arc<dyn AdminPolicy>,
    clock: Arc<dyn TimeSource>,
    sink: Arc<dyn NotificationSink>,
}

impl GasAnalytics {
    /// Starts a builder.
    pub fn builder() -> GasAnalyticsBuilder {
        GasAnalyticsBuilder::new()
    }

    /// Engine configured from `settings`, with the system clock and a private log.
    pub fn from_settings(settings: &AnalyticsSettings) -> Self {
        Self::builder().settings(settings).build()
    }

    // ----- ledger -----

    /// Appends one record for `caller`, stamped with the current time.
    pub fn append(
        &self,
        caller: Address,
        to: Address,
        value: u128,
        gas_used: u64,
        gas_price: u64,
        category: impl Into<String>,
    ) -> AnalyticsResult<TransactionRecord> {
        self.append_draft(
            caller,
            TransactionDraft::new(to, value, gas_used, gas_price, category),
        )
    }

    /// Appends one prepared draft for `caller`.
    pub fn append_draft(
        &self,
        caller: Address,
        draft: TransactionDraft,
    ) -> AnalyticsResult<TransactionRecord> {
        if draft.to.is_zero() {
            warn!(%caller, "rejected append to the zero address");
            return Err(AnalyticsError::InvalidRecipient);
        }

        let record = draft.into_record(caller, self.clock.unix_seconds());
        self.commit(caller, vec![record.clone()]);
        Ok(record)
    }

    /// Appends every draft or none of them.
    ///
    /// Returns the number of records committed. The budget check runs once
    /// on the cumulative total.
    pub fn batch_append(
        &self,
        caller: Address,
        drafts: Vec<TransactionDraft>,
    ) -> AnalyticsResult<usize> {
        if let Some(index) = drafts.iter().position(|draft| draft.to.is_zero()) {
            warn!(%caller, index, "rejected batch with a zero-address recipient");
            return Err(AnalyticsError::InvalidRecipient);
        }
        if drafts.is_empty() {
            return Ok(0);
        }

        let timestamp = self.clock.unix_seconds();
        let records: Vec<_> = drafts
            .into_iter()
            .map(|draft| draft.into_record(caller, timestamp))
            .collect();
        let committed = records.len();
        self.commit(caller, records);
        Ok(committed)
    }

    /// Column-oriented [`batch_append`](Self::batch_append).
    ///
    /// Fails with `ArityMismatch` unless every column has the same length.
    pub fn batch_append_columns<S: AsRef<str>>(
        &self,
        caller: Address,
        to: &[Address],
        values: &[u128],
        gas_used: &[u64],
        gas_prices: &[u64],
        categories: &[S],
    ) -> AnalyticsResult<usize> {
        let lengths = vec![
            to.len(),
            values.len(),
            gas_used.len(),
            gas_prices.len(),
            categories.len(),
        ];
        if lengths.iter().any(|len| *len != to.len()) {
            warn!(%caller, ?lengths, "rejected batch with mismatched columns");
            return Err(AnalyticsError::ArityMismatch { lengths });
        }

        let drafts = (0..to.len())
            .map(|i| {
                TransactionDraft::new(
                    to[i],
                    values[i],
                    gas_used[i],
                    gas_prices[i],
                    categories[i].as_ref(),
                )
            })
            .collect();
        self.batch_append(caller, drafts)
    }

    // Notifications are published while the account is still locked, so
    // they keep the account's commit order.
    fn commit(&self, caller: Address, records: Vec<TransactionRecord>) {
        self.ledger.commit(caller, records, |all, first| {
            for (index, record) in all.iter().enumerate().skip(first) {
                debug!(
                    account = %caller,
                    index,
                    gas_used = record.gas_used,
                    gas_price = record.gas_price,
                    category = %record.category,
                    "transaction recorded"
                );
                self.sink.publish(Notification::TransactionAnalyzed {
                    account: caller,
                    index,
                    to: record.to,
                    gas_used: record.gas_used,
                    gas_price: record.gas_price,
                    cost: record.cost(),
                    category: record.category.clone(),
                });
            }

            let spent = report::total_gas_cost(all);
            if let Some(overrun) = self.budgets.check_after_append(&caller, spent) {
                self.sink.publish(Notification::BudgetExceeded {
                    account: caller,
                    spent: overrun.spent,
                    budget: overrun.budget,
                });
            }
        });
    }

    /// Number of records for `account`.
    pub fn get_count(&self, account: &Address) -> usize {
        self.ledger.count(account)
    }

    /// Every record for `account`, in insertion order.
    pub fn transactions(&self, account: &Address) -> Vec<TransactionRecord> {
        self.ledger.records(account)
    }

    /// Record `index` of `account`.
    pub fn transaction(&self, account: &Address, index: usize) -> Option<TransactionRecord> {
        self.ledger.get(account, index)
    }

    // ----- reports -----

    /// Sum of `gas_used * gas_price` over `account`'s records.
    pub fn total_gas_cost(&self, account: &Address) -> u128 {
        self.ledger.read(account, report::total_gas_cost)
    }

    /// Aggregate report for `account`.
    pub fn generate_report(&self, account: &Address) -> GasReport {
        self.ledger.read(account, report::generate_report)
    }

    /// Average gas of `account`'s `category` records against the registry baseline.
    pub fn compare_against_baseline(&self, account: &Address, category: &str) -> BaselineComparison {
        let baseline = self.baselines.get(category);
        self.ledger.read(account, |records| {
            report::compare_against_baseline(records, category, baseline)
        })
    }

    /// `account`'s records stamped within `[start, end]`.
    pub fn transactions_in_range(
        &self,
        account: &Address,
        start: u64,
        end: u64,
    ) -> Vec<TransactionRecord> {
        self.ledger
            .read(account, |records| report::transactions_in_range(records, start, end))
    }

    /// Efficiency score of `account` in `[0, 100]`.
    pub fn efficiency_score(&self, account: &Address) -> u8 {
        let baselines = self.baselines.snapshot();
        self.ledger
            .read(account, |records| report::efficiency_score(records, &baselines))
    }

    /// Cost above baseline across `account`'s records.
    pub fn estimate_max_potential_savings(&self, account: &Address) -> u128 {
        let baselines = self.baselines.snapshot();
        self.ledger.read(account, |records| {
            report::estimate_max_potential_savings(records, &baselines)
        })
    }

    /// Gas limit recommendation for `account`.
    pub fn recommend(&self, account: &Address) -> GasRecommendation {
        self.ledger.read(account, recommend::recommend)
    }

    // ----- budgets and savings -----

    /// Sets `account`'s advisory gas-cost ceiling.
    pub fn set_budget(&self, account: Address, amount: u128) -> AnalyticsResult<()> {
        self.budgets.set_budget(account, amount)?;
        debug!(%account, amount, "budget configured");
        Ok(())
    }

    /// Configured ceiling for `account`.
    pub fn budget(&self, account: &Address) -> Option<u128> {
        self.budgets.budget(account)
    }

    /// Records savings reported by `account`.
    pub fn report_savings(&self, account: Address, amount: u128) -> AnalyticsResult<()> {
        let total_saved = self.tally.report_savings(account, amount)?;
        info!(%account, amount, total_saved, "gas optimization reported");
        self.sink.publish(Notification::GasOptimized {
            account,
            amount,
            total_saved,
        });
        Ok(())
    }

    /// Savings for `account` and the global optimization count.
    pub fn stats(&self, account: &Address) -> SavingsStats {
        self.tally.stats(account)
    }

    // ----- administration -----

    fn require_administrator(&self, caller: &Address, operation: &'static str) -> AnalyticsResult<()> {
        if self.admin.is_administrator(caller) {
            return Ok(());
        }
        warn!(%caller, operation, "administrator check failed");
        Err(AnalyticsError::unauthorized(operation))
    }

    /// Baseline for `category` (0 if absent).
    pub fn baseline(&self, category: &str) -> u64 {
        self.baselines.get(category)
    }

    /// Every registered baseline, ordered by category.
    pub fn baselines(&self) -> BTreeMap<String, u64> {
        self.baselines.snapshot()
    }

    /// Sets the baseline for `category`. Administrator only.
    pub fn set_baseline(&self, caller: &Address, category: &str, value: u64) -> AnalyticsResult<()> {
        self.require_administrator(caller, "set_baseline")?;
        let previous = self.baselines.set(category, value);
        info!(category, previous, value, "baseline updated");
        self.sink.publish(Notification::BaselineUpdated {
            category: category.to_string(),
            previous,
            value,
        });
        Ok(())
    }

    /// Current analysis fee.
    pub fn analysis_fee(&self) -> u128 {
        self.fees.fee()
    }

    /// Sets the analysis fee. Administrator only.
    pub fn set_analysis_fee(&self, caller: &Address, fee: u128) -> AnalyticsResult<()> {
        self.require_administrator(caller, "set_analysis_fee")?;
        let previous = self.fees.set(fee);
        info!(previous, fee, "analysis fee updated");
        self.sink.publish(Notification::FeeUpdated { previous, fee });
        Ok(())
    }

    /// Withdraws collected fees to `to` through `settlement`. Administrator only.
    ///
    /// Returns the amount `settlement` reports as moved.
    pub fn withdraw_fees(
        &self,
        caller: &Address,
        to: Address,
        settlement: &dyn FeeSettlement,
    ) -> AnalyticsResult<u128> {
        self.require_administrator(caller, "withdraw_fees")?;
        if to.is_zero() {
            return Err(AnalyticsError::InvalidRecipient);
        }
        let amount = settlement.withdraw(&to)?;
        info!(%to, amount, "fees withdrawn");
        self.sink.publish(Notification::FeesWithdrawn { to, amount });
        Ok(amount)
    }
}

impl Default for GasAnalytics {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for GasAnalytics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GasAnalytics")
            .field("accounts", &self.ledger.account_count())
            .field("baselines", &self.baselines.snapshot())
            .field("analysis_fee", &self.fees.fee())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const ADMIN: u64 = 0xa1;

    fn engine() -> (GasAnalytics, Arc<NotificationLog>, Arc<ManualClock>) {
        let log = Arc::new(NotificationLog::new());
        let clock = Arc::new(ManualClock::new(1_700_000_000));
        let engine = GasAnalytics::builder()
            .admin_policy(Arc::new(SingleAdministrator::new(Address::from_low_u64(ADMIN))))
            .clock(clock.clone())
            .sink(log.clone())
            .build();
        (engine, log, clock)
    }

    #[test]
    fn test_append_stamps_caller_and_time() {
        let (engine, _, clock) = engine();
        let caller = Address::from_low_u64(1);

        let record = engine
            .append(caller, Address::from_low_u64(2), 5, 21_000, 2, "transfer")
            .unwrap();
        assert_eq!(record.from, caller);
        assert_eq!(record.timestamp, 1_700_000_000);

        clock.advance(12);
        engine
            .append(caller, Address::from_low_u64(2), 0, 1, 1, "transfer")
            .unwrap();
        assert_eq!(engine.get_count(&caller), 2);
        assert_eq!(
            engine.transaction(&caller, 1).map(|r| r.timestamp),
            Some(1_700_000_012)
        );
    }

    #[test]
    fn test_budget_check_runs_once_per_batch() {
        let (engine, log, _) = engine();
        let caller = Address::from_low_u64(1);
        engine.set_budget(caller, 25).unwrap();

        let drafts = (0..3)
            .map(|_| TransactionDraft::new(Address::from_low_u64(2), 0, 10, 1, "transfer"))
            .collect();
        assert_eq!(engine.batch_append(caller, drafts).unwrap(), 3);

        let overruns: Vec<_> = log
            .drain()
            .into_iter()
            .filter_map(|r| match r.notification {
                Notification::BudgetExceeded { spent, budget, .. } => Some((spent, budget)),
                _ => None,
            })
            .collect();
        assert_eq!(overruns, vec![(30, 25)]);
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let (engine, log, _) = engine();
        let caller = Address::from_low_u64(1);
        assert_eq!(engine.batch_append(caller, Vec::new()).unwrap(), 0);
        assert_eq!(engine.get_count(&caller), 0);
        assert!(log.is_empty());
    }

    #[test]
    fn test_columns_must_line_up() {
        let (engine, _, _) = engine();
        let caller = Address::from_low_u64(1);
        let to = [Address::from_low_u64(2), Address::from_low_u64(3)];

        let err = engine
            .batch_append_columns(caller, &to, &[0, 0], &[10], &[1, 1], &["transfer", "transfer"])
            .unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::ArityMismatch {
                lengths: vec![2, 2, 1, 2, 2]
            }
        );
        assert_eq!(engine.get_count(&caller), 0);

        let committed = engine
            .batch_append_columns(caller, &to, &[0, 0], &[10, 20], &[1, 1], &["transfer", "swap"])
            .unwrap();
        assert_eq!(committed, 2);
        assert_eq!(engine.transaction(&caller, 1).unwrap().category, "swap");
    }

    #[test]
    fn test_settings_seed_engine() {
        let settings = AnalyticsSettings::from_toml_str(
            r#"
            administrator = "0x00000000000000000000000000000000000000a1"
            analysis_fee = 7

            [baselines]
            swap = 120000
            "#,
        )
        .unwrap();
        let engine = GasAnalytics::from_settings(&settings);
        assert_eq!(engine.baseline("swap"), 120_000);
        assert_eq!(engine.baseline("transfer"), 21_000);
        assert_eq!(engine.analysis_fee(), 7);
        assert!(engine
            .set_baseline(&Address::from_low_u64(ADMIN), "swap", 100_000)
            .is_ok());
    }

    #[test]
    fn test_default_engine_has_no_administrator() {
        let engine = GasAnalytics::default();
        let err = engine
            .set_baseline(&Address::from_low_u64(ADMIN), "transfer", 1)
            .unwrap_err();
        assert_eq!(err, AnalyticsError::unauthorized("set_baseline"));
        assert_eq!(engine.baseline("transfer"), 21_000);
    }
}
