// CLI Configuration - Tool settings and TOML update plans
// Principle: Clear mapping between user input and internal configuration

use crate::settings::{SettingId, SettingUpdate, SETTINGS_MODULE};
use crate::types::{Address, CurrencyKey, Differentiator, IdentityError, SettingValue, ValueParseError, U256};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration of the command line tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// RocksDB directory
    pub db_path: PathBuf,

    /// Module every setting is scoped under
    pub module: String,

    /// Default log level when neither RUST_LOG nor --log-level is given
    pub log_level: String,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            db_path: base.join("system-settings").join("db"),
            module: SETTINGS_MODULE.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl SettingsConfig {
    /// Load configuration from TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadFailed(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::WriteFailed(format!("{}: {}", path.display(), e)))
    }

    // Builder-style methods for CLI overrides

    pub fn with_db_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.db_path = path;
        }
        self
    }

    pub fn with_log_level(mut self, level: Option<String>) -> Self {
        if let Some(level) = level {
            self.log_level = level;
        }
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }
}

// =============================================================================
// UPDATE PLAN
// =============================================================================

/// A batch of updates read from a TOML file.
///
/// ```toml
/// [[update]]
/// setting = "issuanceRatio"
/// value = "250000000000000000"
///
/// [[update]]
/// setting = "wrapperMintFeeRate"
/// address = "0x5fbdb2315678afecb367f032d93f642f64180aa3"
/// value = "-50000000000000000"
///
/// [exchange_fee_rates]
/// currencies = ["sUSD", "sETH"]
/// rates = ["3000000000000000", "5000000000000000"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePlan {
    #[serde(default, rename = "update")]
    pub updates: Vec<PlanEntry>,

    #[serde(default)]
    pub exchange_fee_rates: Option<FeeRateBatch>,
}

/// One `[[update]]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub setting: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Parsed according to the setting's kind
    pub value: String,
}

/// The `[exchange_fee_rates]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRateBatch {
    pub currencies: Vec<String>,
    pub rates: Vec<String>,
}

impl UpdatePlan {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadFailed(format!("{}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Typed updates, in file order.
    ///
    /// The whole plan is parsed before anything is applied, so a typo never
    /// leaves a half-applied plan behind.
    pub fn to_updates(&self) -> Result<Vec<SettingUpdate>, ConfigError> {
        self.updates.iter().map(PlanEntry::to_update).collect()
    }
}

impl PlanEntry {
    pub fn to_update(&self) -> Result<SettingUpdate, ConfigError> {
        let setting: SettingId = self
            .setting
            .parse()
            .map_err(|_| ConfigError::UnknownSetting(self.setting.clone()))?;

        let differentiator = parse_differentiator(self.currency.as_deref(), self.address.as_deref())?;
        let value = SettingValue::parse(setting.spec().kind, self.value.trim())?;

        Ok(SettingUpdate { setting, differentiator, value })
    }
}

impl FeeRateBatch {
    /// Currency keys and rates; lengths are left for the settings layer to judge
    pub fn parse(&self) -> Result<(Vec<CurrencyKey>, Vec<U256>), ConfigError> {
        let currencies = self
            .currencies
            .iter()
            .map(|c| c.parse::<CurrencyKey>())
            .collect::<Result<Vec<_>, _>>()?;
        let rates = self
            .rates
            .iter()
            .map(|r| {
                r.trim()
                    .parse::<U256>()
                    .map_err(|_| ConfigError::InvalidRate(r.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok((currencies, rates))
    }
}

/// Differentiator from the optional `currency` / `address` fields
pub fn parse_differentiator(
    currency: Option<&str>,
    address: Option<&str>,
) -> Result<Option<Differentiator>, ConfigError> {
    match (currency, address) {
        (None, None) => Ok(None),
        (Some(c), None) => Ok(Some(Differentiator::Currency(c.parse()?))),
        (None, Some(a)) => Ok(Some(Differentiator::Address(a.parse::<Address>()?))),
        (Some(_), Some(_)) => Err(ConfigError::AmbiguousDifferentiator),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read file: {0}")]
    ReadFailed(String),

    #[error("Failed to write file: {0}")]
    WriteFailed(String),

    #[error("Failed to parse TOML: {0}")]
    ParseFailed(String),

    #[error("Unknown setting: {0}")]
    UnknownSetting(String),

    #[error("Both currency and address given")]
    AmbiguousDifferentiator,

    #[error("Invalid rate: {0}")]
    InvalidRate(String),

    #[error(transparent)]
    InvalidValue(#[from] ValueParseError),

    #[error(transparent)]
    InvalidIdentity(#[from] IdentityError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{I256, ValueKind};
    use tempfile::tempdir;

    const PLAN: &str = r#"
[[update]]
setting = "issuanceRatio"
value = "250000000000000000"

[[update]]
setting = "wrapperMintFeeRate"
address = "0x5fbdb2315678afecb367f032d93f642f64180aa3"
value = "-50000000000000000"

[[update]]
setting = "tradingRewardsEnabled"
value = "true"

[exchange_fee_rates]
currencies = ["sUSD", "sETH"]
rates = ["3000000000000000", "5000000000000000"]
"#;

    #[test]
    fn test_default_config() {
        let config = SettingsConfig::default();
        assert_eq!(config.module, SETTINGS_MODULE);
        assert_eq!(config.log_level, "info");
        assert!(config.db_path.ends_with("system-settings/db"));
    }

    #[test]
    fn test_config_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        let config = SettingsConfig::default()
            .with_db_path(Some(dir.path().join("db")))
            .with_log_level(Some("debug".to_string()))
            .with_module("StagingSettings");
        config.save(&path).unwrap();

        assert_eq!(SettingsConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SettingsConfig = toml::from_str("log_level = \"warn\"").unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.module, SETTINGS_MODULE);
    }

    #[test]
    fn test_builder_none_keeps_value() {
        let config = SettingsConfig::default();
        let same = config.clone().with_db_path(None).with_log_level(None);
        assert_eq!(same, config);
    }

    #[test]
    fn test_plan_to_updates() {
        let plan = UpdatePlan::parse(PLAN).unwrap();
        let updates = plan.to_updates().unwrap();

        assert_eq!(updates.len(), 3);
        assert_eq!(updates[0].setting, SettingId::IssuanceRatio);
        assert_eq!(updates[0].value, SettingValue::UInt(U256::new(250_000_000_000_000_000)));
        assert!(updates[0].differentiator.is_none());

        assert_eq!(updates[1].setting, SettingId::WrapperMintFeeRate);
        assert_eq!(updates[1].value, SettingValue::Int(I256::new(-50_000_000_000_000_000)));
        assert!(matches!(updates[1].differentiator, Some(Differentiator::Address(_))));

        assert_eq!(updates[2].value.kind(), ValueKind::Bool);
    }

    #[test]
    fn test_plan_fee_batch() {
        let plan = UpdatePlan::parse(PLAN).unwrap();
        let (currencies, rates) = plan.exchange_fee_rates.unwrap().parse().unwrap();
        assert_eq!(currencies[0].to_string(), "sUSD");
        assert_eq!(rates[1], U256::new(5_000_000_000_000_000));
    }

    #[test]
    fn test_plan_unknown_setting() {
        let plan = UpdatePlan::parse("[[update]]\nsetting = \"nope\"\nvalue = \"1\"\n").unwrap();
        assert!(matches!(plan.to_updates(), Err(ConfigError::UnknownSetting(_))));
    }

    #[test]
    fn test_plan_value_of_wrong_kind() {
        let plan = UpdatePlan::parse("[[update]]\nsetting = \"issuanceRatio\"\nvalue = \"-1\"\n").unwrap();
        assert!(matches!(plan.to_updates(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_ambiguous_differentiator() {
        assert!(matches!(
            parse_differentiator(Some("sUSD"), Some("0x01")),
            Err(ConfigError::AmbiguousDifferentiator)
        ));
    }

    #[test]
    fn test_empty_plan() {
        let plan = UpdatePlan::parse("").unwrap();
        assert!(plan.to_updates().unwrap().is_empty());
        assert!(plan.exchange_fee_rates.is_none());
    }
}
