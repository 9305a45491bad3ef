//! Subscriber setup for gasopt binaries.
//!
//! One `fmt` layer is chosen by [`LogFormat`] and installed on a
//! `tracing-subscriber` registry behind an [`EnvFilter`].

use crate::{TelemetryError, TelemetryResult};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// Directive used when neither `RUST_LOG` nor the settings name one.
pub const DEFAULT_DIRECTIVE: &str = "gasopt=info,gasopt_config=info,gasopt_engine=info";

type OutputLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// How and how much a gasopt process logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `gasopt_engine=debug`.
    pub level: String,

    /// Output encoding.
    pub format: LogFormat,

    /// ANSI colors for the text and compact encodings.
    pub color: bool,

    /// Print the event target.
    pub include_target: bool,

    /// Print source file and line (text and json only).
    pub include_location: bool,
}

/// Output encoding of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-field human-readable lines
    #[default]
    Text,
    /// Abbreviated single lines
    Compact,
    /// One JSON object per event
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_DIRECTIVE.to_string(),
            format: LogFormat::default(),
            color: true,
            include_target: true,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Filter from `RUST_LOG` if it parses, otherwise from [`level`](Self::level).
    pub fn env_filter(&self) -> TelemetryResult<EnvFilter> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => self.directive_filter(),
        }
    }

    /// Filter parsed from [`level`](Self::level) alone.
    pub fn directive_filter(&self) -> TelemetryResult<EnvFilter> {
        EnvFilter::try_new(&self.level).map_err(|e| TelemetryError::InvalidFilter {
            directive: self.level.clone(),
            reason: e.to_string(),
        })
    }

    fn output_layer(&self) -> OutputLayer {
        let location = self.include_location;
        let layer = fmt::layer().with_target(self.include_target);
        match self.format {
            LogFormat::Text => layer
                .with_ansi(self.color)
                .with_file(location)
                .with_line_number(location)
                .boxed(),
            LogFormat::Compact => layer.compact().with_ansi(self.color).boxed(),
            LogFormat::Json => layer
                .json()
                .with_file(location)
                .with_line_number(location)
                .boxed(),
        }
    }
}

/// Installs the global subscriber described by `config`.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    let filter = config.env_filter()?;

    tracing_subscriber::registry()
        .with(config.output_layer())
        .with(filter)
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    tracing::info!(directive = %config.level, format = ?config.format, "logging initialized");
    Ok(())
}
