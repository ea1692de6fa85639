//! Configuration for the pool ledger

use crate::storage::DEFAULT_STORAGE_KEY;
use crate::validation::MIN_PLAYERS;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Ledger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// RocksDB directory for the state store
    pub data_dir: PathBuf,

    /// Key the application state is saved under
    pub storage_key: String,

    /// Minimum roster size before games can be recorded
    pub min_players: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/pool"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            min_players: MIN_PLAYERS,
        }
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
        let mut config = Config::default();

        if let Ok(data_dir) = std::env::var("POOL_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(key) = std::env::var("POOL_STORAGE_KEY") {
            config.storage_key = key;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check values are usable
    pub fn validate(&self) -> crate::Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(crate::Error::Config("storage_key must not be empty".to_string()));
        }
        if self.min_players < MIN_PLAYERS {
            return Err(crate::Error::Config(format!(
                "min_players must be at least {}, got {}",
                MIN_PLAYERS, self.min_players
            )));
        }
        Ok(())
    }
}
