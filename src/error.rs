//! Request-level error taxonomy
//!
//! Core operations return these kinds directly; only the transport layer
//! turns them into HTTP status codes.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors surfaced by the betting core
#[derive(Debug, Error)]
pub enum Error {
    /// Identifier at the boundary is not a valid id
    #[error("Invalid ID format")]
    InvalidIdFormat,
    /// Game type is not cricket, matka or other
    #[error("Invalid game_type: {0}")]
    InvalidGameType(String),
    /// Market creation with no outcomes
    #[error("Outcomes required")]
    EmptyOutcomes,
    /// Outcome missing key or label
    #[error("Each outcome needs key, label, odds")]
    IncompleteOutcome,
    /// Decimal odds at or below 1.0
    #[error("Odds must be greater than 1.0, got {0}")]
    InvalidOdds(Decimal),
    /// Outcome key repeated within one market
    #[error("Duplicate outcome key: {0}")]
    DuplicateOutcomeKey(String),
    /// Blank username
    #[error("Username required")]
    InvalidUsername,
    /// Stake at or below zero
    #[error("Stake must be positive")]
    InvalidStake,
    /// Referenced market does not exist
    #[error("Market not found")]
    MarketNotFound,
    /// Market is not in the open state
    #[error("Market is not open")]
    MarketNotOpen,
    /// Outcome key does not belong to the market
    #[error("Invalid outcome")]
    InvalidOutcome,
    /// Referenced user does not exist
    #[error("User not found")]
    UserNotFound,
    /// Persistence failure, fatal for the current request
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Persistence-layer errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store could not serve the request
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error is a missing-resource condition rather than
    /// invalid input or a store failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::MarketNotFound | Error::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_messages() {
        assert_eq!(Error::InvalidIdFormat.to_string(), "Invalid ID format");
        assert_eq!(Error::MarketNotOpen.to_string(), "Market is not open");
        assert_eq!(
            Error::InvalidGameType("poker".to_string()).to_string(),
            "Invalid game_type: poker"
        );
        assert_eq!(
            Error::InvalidOdds(dec!(0.9)).to_string(),
            "Odds must be greater than 1.0, got 0.9"
        );
    }

    #[test]
    fn test_not_found_classification() {
        assert!(Error::MarketNotFound.is_not_found());
        assert!(Error::UserNotFound.is_not_found());
        assert!(!Error::MarketNotOpen.is_not_found());
        assert!(!Error::InvalidStake.is_not_found());
    }

    #[test]
    fn test_store_error_conversion() {
        let err: Error = StoreError::Unavailable("connection refused".to_string()).into();
        assert!(matches!(err, Error::Store(_)));
        assert!(!err.is_not_found());
    }
}
