//! Relay error types.
use alloy::primitives::ChainId;
use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

mod chain;
pub use chain::ChainError;

mod intent;
pub use intent::IntentError;

mod quote;
pub use quote::QuoteError;

/// The overarching error type returned by the relay endpoints.
#[derive(Debug, Error)]
pub enum RelayError {
    /// A supplied account address is malformed.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    /// The request targets a chain this relay does not serve.
    #[error("Chain ID mismatch: expected {expected}, got {got}")]
    ChainMismatch {
        /// The chain this relay serves.
        expected: ChainId,
        /// The chain in the request.
        got: ChainId,
    },
    /// The request is malformed.
    #[error("{0}")]
    InvalidParams(String),
    /// Errors related to intents.
    #[error(transparent)]
    Intent(#[from] IntentError),
    /// Errors related to fee quotes.
    #[error(transparent)]
    Quote(#[from] QuoteError),
    /// The chain could not be reached for a value the request depends on.
    #[error("Upstream RPC unavailable")]
    UpstreamUnavailable(#[source] ChainError),
    /// Simulating `execute` against the user's account failed.
    #[error("Gas estimation failed")]
    GasEstimation(#[source] ChainError),
    /// The node did not accept the relay transaction.
    #[error("Failed to broadcast transaction")]
    BroadcastFailed(#[source] ChainError),
    /// An internal error occurred.
    #[error("Internal server error")]
    Internal(#[from] eyre::Error),
}

impl RelayError {
    /// Creates a new [`RelayError::InvalidAddress`] for `input`.
    pub fn invalid_address(input: impl Into<String>) -> Self {
        Self::InvalidAddress(input.into())
    }

    /// Returns the HTTP status the error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidAddress(_)
            | Self::ChainMismatch { .. }
            | Self::InvalidParams(_)
            | Self::Intent(_) => StatusCode::BAD_REQUEST,
            Self::Quote(err) => err.status(),
            Self::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::GasEstimation(_)
            | Self::BroadcastFailed(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON body of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// HTTP status code.
    pub status_code: u16,
    /// Human readable message, stable enough to match on.
    pub message: String,
    /// Canonical reason phrase of the status.
    pub error: String,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            // the cause is logged, never returned
            error!(err = %self, source = ?std::error::Error::source(&self), "Request failed");
        }

        let body = ErrorBody {
            status_code: status.as_u16(),
            message: self.to_string(),
            error: status.canonical_reason().unwrap_or_default().to_string(),
        };
        (status, Json(body)).into_response()
    }
}
