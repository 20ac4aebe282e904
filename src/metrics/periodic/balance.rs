use super::MetricCollector;
use crate::{
    chain::{Chain, ChainApi},
    error::ChainError,
};
use alloy::primitives::{Address, ChainId};
use metrics::gauge;

/// This collector queries the chain for the balance of the relayer.
#[derive(Debug)]
pub struct BalanceCollector {
    /// Address to be queried.
    address: Address,
    /// Chain the relayer pays gas on.
    chain: Chain,
    chain_id: ChainId,
}

impl BalanceCollector {
    pub fn new(address: Address, chain: Chain, chain_id: ChainId) -> Self {
        Self { address, chain, chain_id }
    }
}

impl MetricCollector for BalanceCollector {
    async fn collect(&self) -> Result<(), ChainError> {
        let balance = self.chain.balance(self.address).await?;

        gauge!(
            "balance",
            "address"  => self.address.to_checksum(Some(self.chain_id)),
            "chain_id" => format!("{}", self.chain_id)
        )
        .set::<f64>(balance.into());

        Ok(())
    }
}
