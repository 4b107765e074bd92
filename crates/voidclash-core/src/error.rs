//! Error types for the combat engine.
//!
//! Randomness never produces an error: a miss or a no-op is a valid outcome.
//! Errors only arise while *constructing* things, either from malformed input
//! (dice expressions, arc names, config files) or from a battle assembled
//! without a dice service.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to parse a dice expression such as `"2d6"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    /// The expression is not of the form `NdS` with positive `N` and `S`.
    #[error("invalid dice expression '{expression}': {reason}")]
    InvalidExpression {
        /// The offending input
        expression: String,
        /// What was wrong with it
        reason: &'static str,
    },
}

impl DiceError {
    pub(crate) fn invalid(expression: &str, reason: &'static str) -> Self {
        Self::InvalidExpression {
            expression: expression.to_string(),
            reason,
        }
    }
}

/// Failure to parse a firing arc or range band name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseNameError {
    /// Which vocabulary was being parsed ("firing arc", "order", ...)
    pub kind: &'static str,
    /// The unrecognised input
    pub value: String,
}

/// Errors raised while assembling a battle.
#[derive(Debug, Error)]
pub enum BattleError {
    /// No dice service was supplied and no seed was configured.
    #[error("dice service unavailable: supply a dice service or a seed before building the battle")]
    DiceServiceUnavailable,

    /// The battle configuration is unusable.
    #[error("invalid battle configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON for a [`BattleConfig`](crate::config::BattleConfig).
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The file parsed but describes an unusable battle.
    #[error(transparent)]
    Invalid(#[from] BattleError),
}

/// Convenience alias for battle construction results.
pub type Result<T> = std::result::Result<T, BattleError>;
