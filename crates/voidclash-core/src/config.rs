//! Battle configuration.
//!
//! ```
//! use voidclash_core::config::BattleConfig;
//!
//! let config = BattleConfig::from_json_str(r#"{"rounds": 5, "seed": 42}"#).unwrap();
//! assert_eq!(config.rounds, 5);
//! assert_eq!(config.seed, Some(42));
//!
//! assert!(BattleConfig::from_json_str(r#"{"rounds": 0}"#).is_err());
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BattleError, ConfigError};

/// Rounds fought when nothing else is configured.
pub const DEFAULT_ROUNDS: u32 = 3;

/// Settings for one battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Maximum number of rounds; must be positive.
    pub rounds: u32,
    /// Seed for the built-in dice; `None` means the caller supplies dice.
    pub seed: Option<u64>,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_ROUNDS,
            seed: None,
        }
    }
}

impl BattleConfig {
    /// Checks that the configuration describes a battle that can be fought.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidConfig`] if `rounds` is zero.
    pub fn validate(&self) -> Result<(), BattleError> {
        if self.rounds == 0 {
            return Err(BattleError::InvalidConfig(
                "rounds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parses and validates a JSON configuration. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, plus the
    /// errors of [`from_json_str`](Self::from_json_str).
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), ?config, "loaded battle config");
        Ok(config)
    }
}
