//! Fee quote types.

use alloy::{
    primitives::{Address, Bytes, U256},
    sol,
};
use serde::{Deserialize, Serialize};

sol! {
    /// The relayer's EIP-712 commitment to a fee.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct FeeQuote {
        address feeToken;
        uint256 feeAmount;
        uint256 deadline;
    }
}

/// A relay-signed fee quote as returned to clients.
///
/// Only `feeToken`, `feeAmount` and `deadline` are covered by the signature, the remaining fields
/// are informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeQuoteDto {
    /// Fee in the smallest unit of `fee_token`.
    #[serde(with = "crate::serde::decimal")]
    pub fee_amount: U256,
    /// The token the fee is paid in.
    pub fee_token: Address,
    /// Unix timestamp (seconds) until which the quote is honored.
    #[serde(with = "crate::serde::decimal")]
    pub deadline: U256,
    /// The relayer's signature over the [`FeeQuote`].
    pub signature: Bytes,
    /// The address that signed the quote and pays gas.
    pub relayer_address: Address,
    /// Percentage buffer applied on top of the converted gas cost.
    pub buffer_percent: u64,
    /// Gas units the quote was computed for.
    #[serde(with = "crate::serde::decimal")]
    pub estimated_gas: U256,
    /// Gas price, in wei, the quote was computed with.
    #[serde(with = "crate::serde::decimal")]
    pub gas_price: U256,
}

impl FeeQuoteDto {
    /// Returns the signed part of the quote.
    pub fn fee_quote(&self) -> FeeQuote {
        FeeQuote { feeToken: self.fee_token, feeAmount: self.fee_amount, deadline: self.deadline }
    }
}

/// Request body of `POST /fees/verify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyFeeQuoteRequest {
    /// Quoted fee amount.
    #[serde(with = "crate::serde::decimal")]
    pub fee_amount: U256,
    /// Quoted fee token.
    pub fee_token: Address,
    /// Quoted deadline.
    #[serde(with = "crate::serde::decimal")]
    pub deadline: U256,
    /// Relayer signature returned with the quote.
    pub signature: Bytes,
}

/// Response of `POST /fees/verify`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyFeeQuoteResponse {
    /// Whether the quote is unexpired and signed by this relayer.
    pub valid: bool,
}
