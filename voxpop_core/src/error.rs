//! Error types for the sampling and allocation core.

use thiserror::Error;

/// Errors surfaced by the core engine.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Category table is empty or carries no positive weight
    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),
}

impl CoreError {
    /// Creates an invalid-distribution error.
    pub fn invalid_distribution(msg: impl Into<String>) -> Self {
        Self::InvalidDistribution(msg.into())
    }
}
