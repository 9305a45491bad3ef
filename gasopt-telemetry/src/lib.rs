//! # gasopt telemetry
//!
//! Structured logging for gasopt processes. Library crates only emit
//! `tracing` events; binaries call [`init_logging`] once at startup to
//! install a subscriber.

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{init_logging, LogConfig, LogFormat, DEFAULT_DIRECTIVE};
