//! Subword pooling strategies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a pooling strategy name is not recognized.
///
/// Raised at configuration time, before any model call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown pooling strategy: {0}")]
pub struct UnknownPoolingStrategy(pub String);

/// Rule for collapsing a token's subword vectors into one token vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolingStrategy {
    /// Mean of all aligned subword vectors
    #[default]
    Average,
    /// Vector of the first aligned subword
    First,
    /// Vector of the last aligned subword
    Last,
    /// Mean of the first and last aligned subword vectors
    FirstLast,
    /// Component-wise maximum across aligned subword vectors
    Max,
}

impl PoolingStrategy {
    /// Canonical configuration name of the strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolingStrategy::Average => "average",
            PoolingStrategy::First => "first",
            PoolingStrategy::Last => "last",
            PoolingStrategy::FirstLast => "first_last",
            PoolingStrategy::Max => "max",
        }
    }
}

impl FromStr for PoolingStrategy {
    type Err = UnknownPoolingStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "average" => Ok(PoolingStrategy::Average),
            "first" => Ok(PoolingStrategy::First),
            "last" => Ok(PoolingStrategy::Last),
            "first_last" => Ok(PoolingStrategy::FirstLast),
            "max" => Ok(PoolingStrategy::Max),
            other => Err(UnknownPoolingStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for PoolingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
