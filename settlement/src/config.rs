//! Configuration for settlement

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Settlement configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Ledger (roster, game log, storage) configuration
    pub ledger: pool_ledger::Config,

    /// Netting configuration
    pub netting: NettingConfig,

    /// Reject invalid snapshots before computing
    ///
    /// When false, orphaned games are skipped and undersized rosters
    /// produce whatever the balance rule yields.
    pub strict_validation: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "pool-settlement".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            ledger: pool_ledger::Config::default(),
            netting: NettingConfig::default(),
            strict_validation: true,
        }
    }
}

/// Netting configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NettingConfig {
    /// Decimal places transfer amounts are rounded to
    pub currency_scale: u32,

    /// Largest debt/credit mismatch tolerated before the plan is rejected
    #[serde(with = "rust_decimal::serde::str")]
    pub imbalance_tolerance: Decimal,
}

impl Default for NettingConfig {
    fn default() -> Self {
        Self {
            currency_scale: pool_ledger::CURRENCY_SCALE,
            imbalance_tolerance: Decimal::new(1, 2), // one cent
        }
    }
}

impl NettingConfig {
    /// Check values are usable
    pub fn validate(&self) -> crate::Result<()> {
        if self.currency_scale > 8 {
            return Err(crate::Error::Config(format!(
                "currency_scale {} exceeds 8",
                self.currency_scale
            )));
        }
        if self.imbalance_tolerance < Decimal::ZERO {
            return Err(crate::Error::Config(format!(
                "imbalance_tolerance must not be negative, got {}",
                self.imbalance_tolerance
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config {
            ledger: pool_ledger::Config::from_env()?,
            ..Config::default()
        };

        if let Ok(tolerance) = std::env::var("SETTLEMENT_TOLERANCE") {
            config.netting.imbalance_tolerance = Decimal::from_str(tolerance.trim())
                .map_err(|e| crate::Error::Config(format!("Invalid SETTLEMENT_TOLERANCE: {}", e)))?;
        }

        if let Ok(strict) = std::env::var("SETTLEMENT_STRICT") {
            config.strict_validation = parse_flag(&strict).ok_or_else(|| {
                crate::Error::Config(format!("Invalid SETTLEMENT_STRICT: {:?}", strict))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from `POOL_CONFIG` if set, otherwise from environment variables
    pub fn load() -> crate::Result<Self> {
        match std::env::var("POOL_CONFIG") {
            Ok(path) => Self::from_file(PathBuf::from(path)),
            Err(_) => Self::from_env(),
        }
    }

    /// Check values are usable
    pub fn validate(&self) -> crate::Result<()> {
        self.ledger.validate()?;
        self.netting.validate()
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
