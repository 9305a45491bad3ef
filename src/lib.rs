//! # gasopt
//!
//! Per-account transaction ledger with gas cost analytics.
//!
//! This crate re-exports the workspace crates under one roof:
//!
//! - [`primitives`]: account addresses
//! - [`config`]: TOML settings
//! - [`telemetry`]: logging setup
//! - [`engine`]: the ledger and every analytic derived from it

pub use gasopt_config as config;
pub use gasopt_engine as engine;
pub use gasopt_primitives as primitives;
pub use gasopt_telemetry as telemetry;

pub use gasopt_config::AnalyticsSettings;
pub use gasopt_engine::{
    AnalyticsError, AnalyticsResult, GasAnalytics, GasAnalyticsBuilder, GasRecommendation,
    GasReport, TransactionDraft, TransactionRecord,
};
pub use gasopt_primitives::Address;
