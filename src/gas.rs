//! Gas price and gas usage estimates.

use crate::{
    chain::{Chain, ChainApi},
    error::RelayError,
};
use alloy::primitives::{Address, U256};
use tracing::{debug, instrument};

/// A delegated ERC20 transfer a fee is quoted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferParams {
    /// The token being transferred.
    pub token: Address,
    /// Transfer amount in the token's smallest unit.
    pub amount: U256,
    /// The transfer recipient.
    pub recipient: Address,
    /// The sending account, if known.
    pub sender: Option<Address>,
}

/// Reads gas prices from the chain and estimates relay gas usage.
#[derive(Debug, Clone)]
pub struct GasOracle {
    chain: Chain,
    execute_gas: u64,
}

impl GasOracle {
    /// Create a new [`GasOracle`] estimating `execute_gas` units per delegated transfer.
    pub fn new(chain: Chain, execute_gas: u64) -> Self {
        Self { chain, execute_gas }
    }

    /// Returns the current network gas price in wei.
    ///
    /// Read failures are not retried.
    #[instrument(skip_all)]
    pub async fn gas_price(&self) -> Result<u128, RelayError> {
        let gas_price = self.chain.gas_price().await.map_err(RelayError::UpstreamUnavailable)?;
        debug!(gas_price, "Fetched gas price");
        Ok(gas_price)
    }

    /// Whether `current` does not exceed `max`.
    pub fn is_acceptable(current: u128, max: u128) -> bool {
        current <= max
    }

    /// Returns the gas units of executing `params` through the delegated account.
    ///
    /// This is the configured constant rather than a simulation: before the user signs there is
    /// no valid signature, and the account's ECDSA recovery reverts on a dummy one.
    pub fn estimate_execute_gas(&self, _params: &TransferParams) -> u64 {
        self.execute_gas
    }
}
