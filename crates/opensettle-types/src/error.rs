//! Error types for the OpenSettle settlement engine.
//!
//! All errors use the `ST_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Token errors
//! - 2xx: Sale errors
//! - 3xx: Balance / supply errors
//! - 4xx: Oracle errors
//! - 5xx: Storage errors
//! - 9xx: General / internal errors
//!
//! Inconclusive verification is deliberately **not** an error: it maps to
//! the `PendingCheck` outcome and a success envelope at the service
//! boundary (the caller should retry later).

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{SaleId, TokenId};

/// Central error enum for all OpenSettle operations.
#[derive(Debug, Error)]
pub enum SettleError {
    // =================================================================
    // Token Errors (1xx)
    // =================================================================
    /// The referenced token does not exist.
    #[error("ST_ERR_100: Token not found: {0}")]
    TokenNotFound(TokenId),

    /// The token definition failed validation.
    #[error("ST_ERR_101: Invalid token: {reason}")]
    InvalidToken { reason: String },

    // =================================================================
    // Sale Errors (2xx)
    // =================================================================
    /// The referenced sale does not exist.
    #[error("ST_ERR_200: Sale not found: {0}")]
    SaleNotFound(SaleId),

    /// A buy or transfer request carried malformed or non-positive fields.
    #[error("ST_ERR_201: Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A sale already Confirmed was asked to change state. The settlement
    /// engine treats this as an idempotent success upstream; storage-level
    /// flips surface it so the guard is enforced in depth.
    #[error("ST_ERR_202: Sale already confirmed: {0}")]
    SaleAlreadyConfirmed(SaleId),

    // =================================================================
    // Balance / Supply Errors (3xx)
    // =================================================================
    /// Requested quantity exceeds the token's remaining supply.
    #[error("ST_ERR_300: Insufficient supply: requested {requested}, remaining {remaining}")]
    InsufficientSupply {
        requested: Decimal,
        remaining: Decimal,
    },

    /// The debited account holds less than the requested amount.
    #[error("ST_ERR_301: Insufficient balance: requested {requested}, held {held}")]
    InsufficientBalance { requested: Decimal, held: Decimal },

    // =================================================================
    // Oracle Errors (4xx)
    // =================================================================
    /// The ledger oracle could not be reached or timed out. The settlement
    /// engine degrades this to a `PendingCheck` outcome, never a caller
    /// failure.
    #[error("ST_ERR_400: Ledger oracle unavailable: {reason}")]
    OracleUnavailable { reason: String },

    // =================================================================
    // Storage Errors (5xx)
    // =================================================================
    /// The key-value store failed an operation.
    #[error("ST_ERR_500: Storage failure: {reason}")]
    StorageFailure { reason: String },

    /// A stored record failed to serialize or deserialize.
    #[error("ST_ERR_501: Serialization error: {0}")]
    Serialization(String),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("ST_ERR_900: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SettleError>;

impl From<serde_json::Error> for SettleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for SettleError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageFailure {
            reason: err.to_string(),
        }
    }
}

impl SettleError {
    /// Whether this error is the caller's fault (4xx-equivalent at an HTTP
    /// boundary) rather than an infrastructure fault.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::TokenNotFound(_)
                | Self::InvalidToken { .. }
                | Self::SaleNotFound(_)
                | Self::InvalidInput { .. }
                | Self::InsufficientSupply { .. }
                | Self::InsufficientBalance { .. }
        )
    }
}
