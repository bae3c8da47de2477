use placepick_core::{ConfigurationError, ValidationError};
use thiserror::Error;

use crate::state::SessionState;

/// Failure reported by a place data source while searching or fetching details.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataSourceError {
    /// Connectivity failure; the same request may succeed later.
    #[error("network error: {0}")]
    Network(String),

    #[error("place not found: {0}")]
    NotFound(String),

    #[error("data source quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Any other provider-reported failure.
    #[error("data source error {code}: {message}")]
    Provider { code: String, message: String },
}

impl DataSourceError {
    /// Whether a fresh session could reasonably succeed where this one failed.
    ///
    /// The session never retries on its own; hosts use this to decide whether
    /// to offer the user a retry.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, DataSourceError::Network(_))
    }
}

/// Why a session ended in the `Failed` state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PickerError {
    #[error("selected place is invalid: {0}")]
    Validation(#[from] ValidationError),

    #[error("place data source failed: {0}")]
    DataSource(#[from] DataSourceError),
}

/// Errors returned synchronously to the caller driving a session.
///
/// None of these are recoverable within the session; the caller must build a
/// new one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// The operation is not allowed in the session's current state.
    #[error("cannot {operation} while the session is {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    #[error("candidate {index} does not exist ({available} shown)")]
    CandidateOutOfRange { index: usize, available: usize },

    #[error("invalid picker configuration: {0}")]
    Configuration(#[from] ConfigurationError),
}
