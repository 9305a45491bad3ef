//! Error types for engine operations.

use thiserror::Error;

/// Errors returned by the analytics engine.
///
/// Every failure is reported before any state changes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    /// The destination account is the zero address.
    #[error("Invalid recipient: destination must not be the zero address")]
    InvalidRecipient,

    /// A positive amount was required.
    #[error("Invalid amount: {what} must be greater than zero")]
    InvalidAmount {
        /// Which amount was rejected.
        what: &'static str,
    },

    /// The caller is not the administrator.
    #[error("Unauthorized: {operation} requires the administrator")]
    Unauthorized {
        /// Operation that was refused.
        operation: &'static str,
    },

    /// Batch columns do not line up.
    #[error("Arity mismatch: batch columns have lengths {lengths:?}")]
    ArityMismatch {
        /// Length of each column, in argument order.
        lengths: Vec<usize>,
    },

    /// The external fee collaborator failed.
    #[error("Settlement failed: {message}")]
    Settlement {
        /// Message from the collaborator.
        message: String,
    },
}

impl AnalyticsError {
    /// Create an invalid amount error.
    pub fn invalid_amount(what: &'static str) -> Self {
        Self::InvalidAmount { what }
    }

    /// Create an unauthorized error.
    pub fn unauthorized(operation: &'static str) -> Self {
        Self::Unauthorized { operation }
    }

    /// Create a settlement error.
    pub fn settlement<S: Into<String>>(message: S) -> Self {
        Self::Settlement {
            message: message.into(),
        }
    }
}

/// Result type for engine operations.
pub type AnalyticsResult<T> = std::result::Result<T, AnalyticsError>;
