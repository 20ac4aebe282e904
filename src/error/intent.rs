use alloy::primitives::{Address, U256};
use thiserror::Error;

/// Errors related to intents.
#[derive(Debug, Error)]
pub enum IntentError {
    /// The intent deadline is not in the future.
    #[error("Intent deadline has expired: deadline {deadline}, now {now}")]
    DeadlineExpired {
        /// The deadline in the intent.
        deadline: U256,
        /// The time the intent was checked at.
        now: u64,
    },
    /// The signature is not a well-formed 65 byte ECDSA signature.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
    /// The intent was not signed by the claimed user.
    #[error("Signature verification failed: expected {expected}, recovered {recovered}")]
    SignatureVerificationFailed {
        /// The user address in the request.
        expected: Address,
        /// The address recovered from the signature.
        recovered: Address,
    },
    /// The network gas price is above the configured ceiling.
    #[error("Gas price too high: current {current} wei exceeds maximum {max} wei")]
    GasPriceTooHigh {
        /// The current network gas price.
        current: u128,
        /// The configured ceiling.
        max: u128,
    },
}
