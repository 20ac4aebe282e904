use alloy::primitives::Address;
use http::StatusCode;
use thiserror::Error;

/// Errors related to fee quotes.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The provided fee token is not supported.
    #[error("Unsupported fee token: {0}")]
    UnsupportedFeeToken(Address),
    /// The transfer amount is missing, malformed or zero.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    /// The configured prices cannot be converted into a fee.
    #[error("Fee token price not available: {0}")]
    UnavailablePrice(Address),
}

impl QuoteError {
    /// Returns the HTTP status the error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::UnsupportedFeeToken(_) | Self::InvalidAmount(_) => StatusCode::BAD_REQUEST,
            Self::UnavailablePrice(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
