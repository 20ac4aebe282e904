//! HTTP request and response types.

use alloy::primitives::{Address, ChainId, U256};
use serde::{Deserialize, Serialize};

/// Query of `GET /fees/quote`.
///
/// Fields are parsed by the handler so malformed values produce a descriptive `400`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeQuoteParams {
    /// Fee token address.
    pub token: Option<String>,
    /// Transfer amount in the token's smallest unit.
    pub amount: Option<String>,
    /// Transfer recipient.
    pub recipient: Option<String>,
    /// Transfer sender, if known.
    pub sender: Option<String>,
}

/// Query of `GET /nonce/{address}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonceParams {
    /// Chain the caller intends to sign for.
    pub chain_id: Option<String>,
}

/// Response of `GET /nonce/{address}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonceResponse {
    /// The account's current replay-protection counter.
    #[serde(with = "crate::serde::decimal")]
    pub nonce: U256,
    /// The queried account.
    pub address: Address,
}

/// Response of `GET /relay/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayStatus {
    /// The relayer account paying gas.
    pub relayer_address: Address,
    /// Relayer balance in native units, as a decimal string.
    pub balance: String,
    /// The chain the relay serves.
    pub chain_id: ChainId,
    /// Whether the relayer balance is above the health threshold.
    pub healthy: bool,
}

/// Liveness state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Chain reachable and relayer funded.
    Ok,
    /// The service is up but cannot relay reliably.
    Degraded,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Liveness state.
    pub status: HealthStatus,
    /// Relay version.
    pub version: String,
}
