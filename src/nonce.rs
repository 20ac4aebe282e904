//! Replay-protection nonce lookup.
//!
//! Under EIP-7702 the delegated code runs in the user's own account, and the implementation keys
//! its nonces by `address(this)`. The nonce is therefore read from the user's address, with the
//! user's address as the argument. An account without code has never delegated and has no
//! counter yet.

use crate::{
    chain::{Chain, ChainApi},
    error::RelayError,
    types::parse_address,
};
use alloy::primitives::{Address, ChainId, U256};
use tracing::{debug, instrument, warn};

/// Resolves the nonce a user must sign their next intent with.
#[derive(Debug, Clone)]
pub struct NonceResolver {
    chain: Chain,
    chain_id: ChainId,
}

impl NonceResolver {
    /// Create a new [`NonceResolver`] for the chain with id `chain_id`.
    pub fn new(chain: Chain, chain_id: ChainId) -> Self {
        Self { chain, chain_id }
    }

    /// Returns the current nonce of `address`.
    ///
    /// Fails if `address` is malformed or `chain_id` is not the served chain. Chain read failures
    /// resolve to nonce `0`.
    #[instrument(skip(self))]
    pub async fn get_nonce(
        &self,
        address: &str,
        chain_id: Option<ChainId>,
    ) -> Result<(Address, U256), RelayError> {
        let account = parse_address(address).ok_or_else(|| RelayError::invalid_address(address))?;
        match chain_id {
            Some(chain_id) if chain_id != self.chain_id => {
                return Err(RelayError::ChainMismatch { expected: self.chain_id, got: chain_id });
            }
            _ => {}
        }

        Ok((account, self.resolve(account).await))
    }

    /// Reads the nonce of `account`.
    // todo: a revert and an unreachable node both read as 0 here, which hands out a stale nonce
    // if the account has delegated; surface read failures once clients can retry
    async fn resolve(&self, account: Address) -> U256 {
        let code = match self.chain.code_at(account).await {
            Ok(code) => code,
            Err(err) => {
                warn!(%account, %err, "Failed to read account code, using nonce 0");
                return U256::ZERO;
            }
        };

        if code.is_empty() {
            debug!(%account, "Account not delegated");
            return U256::ZERO;
        }

        match self.chain.delegated_nonce(account).await {
            Ok(nonce) => nonce,
            Err(err) => {
                warn!(%account, %err, "Failed to read delegated nonce, using nonce 0");
                U256::ZERO
            }
        }
    }
}
