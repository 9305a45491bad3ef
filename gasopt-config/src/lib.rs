//! # gasopt configuration
//!
//! Settings consumed when bootstrapping an analytics engine: who the
//! administrator is, which category baselines to seed, the initial
//! analysis fee and how to log.

mod error;
mod settings;

pub use error::{ConfigError, ConfigResult};
pub use settings::{
    default_baselines, AnalyticsSettings, CONTRACT_CALL_BASELINE, DEPLOYMENT_BASELINE,
    TRANSFER_BASELINE,
};

pub use gasopt_telemetry::{LogConfig, LogFormat};
