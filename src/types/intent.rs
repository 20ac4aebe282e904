//! Relay request types.

use super::Intent;
use alloy::primitives::{Address, B256, Bytes, ChainId, U256};
use serde::{Deserialize, Serialize};

/// An [`Intent`] as it crosses the HTTP boundary, with numbers as decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentParams {
    /// The contract the delegated call targets.
    pub destination: Address,
    /// Native value forwarded with the call.
    #[serde(with = "crate::serde::decimal")]
    pub value: U256,
    /// Encoded call.
    pub data: Bytes,
    /// Replay-protection counter the account expects.
    #[serde(with = "crate::serde::decimal")]
    pub nonce: U256,
    /// Unix timestamp after which the intent is invalid.
    #[serde(with = "crate::serde::decimal")]
    pub deadline: U256,
}

impl From<IntentParams> for Intent {
    fn from(params: IntentParams) -> Self {
        Self {
            destination: params.destination,
            value: params.value,
            data: params.data,
            nonce: params.nonce,
            deadline: params.deadline,
        }
    }
}

impl From<Intent> for IntentParams {
    fn from(intent: Intent) -> Self {
        Self {
            destination: intent.destination,
            value: intent.value,
            data: intent.data,
            nonce: intent.nonce,
            deadline: intent.deadline,
        }
    }
}

/// Request body of `POST /relay`.
///
/// `user_address` is kept as submitted and validated by the relay pipeline, after the chain and
/// deadline checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayRequest {
    /// The EOA that signed the intent.
    pub user_address: String,
    /// 65 byte `r || s || v` signature over the intent digest.
    pub signature: Bytes,
    /// The signed intent.
    pub intent: IntentParams,
    /// Chain the intent was signed for.
    #[serde(with = "crate::serde::decimal::chain_id")]
    pub chain_id: ChainId,
}

/// Status reported for a submitted relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayTxStatus {
    /// The transaction was accepted by the node.
    Submitted,
}

/// Response of `POST /relay`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResponse {
    /// Hash of the broadcast transaction.
    pub tx_hash: B256,
    /// Submission status.
    pub status: RelayTxStatus,
    /// Human readable status message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
