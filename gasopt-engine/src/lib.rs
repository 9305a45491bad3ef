//! # gasopt engine
//!
//! Append-only per-account transaction ledger and the gas analytics
//! computed from it.
//!
//! ## Components
//!
//! - **TransactionLedger**: per-account ordered record sequences
//! - **BaselineRegistry**: expected gas per category, administrator-managed
//! - **BudgetMonitor**: advisory gas-cost ceilings checked on every append
//! - **report**: totals, extremes, baseline comparison, ranges, efficiency
//! - **recommend**: suggested gas limits
//! - **OptimizationTally**: caller-reported savings
//! - **GasAnalytics**: facade tying the above to an administrator policy,
//!   a clock and a notification sink
//!
//! ## Example
//!
//! ```rust
//! use gasopt_engine::GasAnalytics;
//! use gasopt_primitives::Address;
//!
//! let engine = GasAnalytics::default();
//! let account = Address::from_low_u64(1);
//! engine
//!     .append(account, Address::from_low_u64(2), 0, 42_000, 1, "transfer")
//!     .unwrap();
//!
//! assert_eq!(engine.efficiency_score(&account), 50);
//! assert_eq!(engine.generate_report(&account).total_gas_cost, 42_000);
//! ```

pub mod auth;
pub mod baseline;
pub mod budget;
pub mod clock;
pub mod engine;
pub mod error;
pub mod events;
pub mod fees;
pub mod ledger;
pub mod recommend;
pub mod record;
pub mod report;
pub mod tally;

pub use auth::{AdminPolicy, NoAdministrator, SingleAdministrator};
pub use baseline::{BaselineLookup, BaselineRegistry};
pub use budget::{BudgetMonitor, BudgetOverrun};
pub use clock::{ManualClock, SystemClock, TimeSource};
pub use engine::{GasAnalytics, GasAnalyticsBuilder};
pub use error::{AnalyticsError, AnalyticsResult};
pub use events::{Notification, NotificationLog, NotificationRecord, NotificationSink};
pub use fees::{FeeSchedule, FeeSettlement};
pub use ledger::TransactionLedger;
pub use recommend::GasRecommendation;
pub use record::{
    TransactionDraft, TransactionRecord, CATEGORY_CONTRACT_CALL, CATEGORY_DEPLOYMENT,
    CATEGORY_TRANSFER,
};
pub use report::{BaselineComparison, GasReport};
pub use tally::{OptimizationTally, SavingsStats};
