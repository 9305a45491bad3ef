//! Analytics engine settings.

use crate::{ConfigError, ConfigResult};
use gasopt_primitives::{Address, CATEGORY_CONTRACT_CALL, CATEGORY_DEPLOYMENT, CATEGORY_TRANSFER};
use gasopt_telemetry::LogConfig;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Expected gas for a plain value transfer.
pub const TRANSFER_BASELINE: u64 = 21_000;
/// Expected gas for a contract invocation.
pub const CONTRACT_CALL_BASELINE: u64 = 50_000;
/// Expected gas for a contract deployment.
pub const DEPLOYMENT_BASELINE: u64 = 200_000;

/// Baseline table every fresh registry starts from.
pub fn default_baselines() -> BTreeMap<String, u64> {
    BTreeMap::from([
        (CATEGORY_TRANSFER.to_string(), TRANSFER_BASELINE),
        (CATEGORY_CONTRACT_CALL.to_string(), CONTRACT_CALL_BASELINE),
        (CATEGORY_DEPLOYMENT.to_string(), DEPLOYMENT_BASELINE),
    ])
}

// Seeded categories missing from the document keep their defaults.
fn merge_over_defaults<'de, D>(deserializer: D) -> Result<BTreeMap<String, u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut overrides = BTreeMap::<String, u64>::deserialize(deserializer)?;
    let mut merged = default_baselines();
    merged.append(&mut overrides);
    Ok(merged)
}

/// Settings for one analytics engine instance.
///
/// ```toml
/// administrator = "0x00000000000000000000000000000000000000a1"
/// analysis_fee = 1000
///
/// [baselines]
/// transfer = 21000
/// swap = 120000
///
/// [logging]
/// level = "debug"
/// format = "json"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSettings {
    /// Account allowed to run administrator operations. `None` disables them.
    #[serde(default)]
    pub administrator: Option<Address>,

    /// Category baselines, merged over [`default_baselines`].
    #[serde(default = "default_baselines", deserialize_with = "merge_over_defaults")]
    pub baselines: BTreeMap<String, u64>,

    /// Initial analysis fee.
    #[serde(default)]
    pub analysis_fee: u64,

    /// Logging setup for binaries.
    #[serde(default)]
    pub logging: LogConfig,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            administrator: None,
            baselines: default_baselines(),
            analysis_fee: 0,
            logging: LogConfig::default(),
        }
    }
}

impl AnalyticsSettings {
    /// Parses and validates settings from a TOML document.
    pub fn from_toml_str(input: &str) -> ConfigResult<Self> {
        let settings: Self = toml::from_str(input)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading analytics settings");
        Self::from_toml_str(&raw)
    }

    /// Rejects values no engine can run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if matches!(self.administrator, Some(admin) if admin.is_zero()) {
            return Err(ConfigError::Invalid(
                "administrator must not be the zero address".to_string(),
            ));
        }
        if self.baselines.keys().any(|category| category.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "baseline categories must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AnalyticsSettings::default();
        assert!(settings.administrator.is_none());
        assert_eq!(settings.baselines.get(CATEGORY_TRANSFER), Some(&21_000));
        assert_eq!(settings.baselines.get(CATEGORY_CONTRACT_CALL), Some(&50_000));
        assert_eq!(settings.baselines.get(CATEGORY_DEPLOYMENT), Some(&200_000));
        assert_eq!(settings.baselines.len(), 3);
        assert_eq!(settings.analysis_fee, 0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let settings = AnalyticsSettings::from_toml_str("").unwrap();
        assert_eq!(settings, AnalyticsSettings::default());
    }

    #[test]
    fn test_baselines_merge_over_seed() {
        let settings = AnalyticsSettings::from_toml_str(
            r#"
            [baselines]
            transfer = 25000
            swap = 120000
            "#,
        )
        .unwrap();
        assert_eq!(settings.baselines.get("transfer"), Some(&25_000));
        assert_eq!(settings.baselines.get("swap"), Some(&120_000));
        assert_eq!(settings.baselines.get("deployment"), Some(&200_000));
    }

    #[test]
    fn test_plain_deserialize_keeps_seed() {
        let settings: AnalyticsSettings = toml::from_str(
            r#"
            [baselines]
            swap = 120000
            "#,
        )
        .unwrap();
        assert_eq!(settings.baselines.get("swap"), Some(&120_000));
        assert_eq!(settings.baselines.get(CATEGORY_TRANSFER), Some(&TRANSFER_BASELINE));
        assert_eq!(settings.baselines.get(CATEGORY_DEPLOYMENT), Some(&DEPLOYMENT_BASELINE));
    }

    #[test]
    fn test_zero_administrator_rejected() {
        let err = AnalyticsSettings::from_toml_str(
            r#"administrator = "0x0000000000000000000000000000000000000000""#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_administrator_is_parse_error() {
        let err = AnalyticsSettings::from_toml_str(r#"administrator = "0x12""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
