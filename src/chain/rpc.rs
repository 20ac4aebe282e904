//! [`ChainApi`] backed by an Ethereum JSON-RPC endpoint.

use super::{ChainApi, ExecuteCall, Result};
use crate::{signers::RelayerIdentity, types::IDelegatedAccount};
use alloy::{
    primitives::{Address, B256, Bytes, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
};
use async_trait::async_trait;
use tracing::{debug, instrument};
use url::Url;

/// Chain access through an alloy provider that signs with the relayer wallet.
#[derive(Debug, Clone)]
pub struct RpcChain {
    provider: DynProvider,
    relayer: Address,
}

impl RpcChain {
    /// Create a new [`RpcChain`] sending transactions from `relayer`.
    ///
    /// The provider must be able to sign for `relayer`.
    pub fn new(provider: DynProvider, relayer: Address) -> Self {
        Self { provider, relayer }
    }

    /// Connects to `endpoint` over HTTP, signing transactions as the relayer.
    pub fn connect_http(endpoint: Url, relayer: &RelayerIdentity) -> Self {
        let provider =
            ProviderBuilder::new().wallet(relayer.wallet()).connect_http(endpoint).erased();
        Self::new(provider, relayer.address())
    }

    /// Returns the underlying provider.
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }
}

#[async_trait]
impl ChainApi for RpcChain {
    async fn gas_price(&self) -> Result<u128> {
        Ok(self.provider.get_gas_price().await?)
    }

    async fn code_at(&self, address: Address) -> Result<Bytes> {
        Ok(self.provider.get_code_at(address).await?)
    }

    async fn delegated_nonce(&self, account: Address) -> Result<U256> {
        // the delegated code keys nonces by `address(this)`, so both the callee and the argument
        // are the account itself
        Ok(IDelegatedAccount::new(account, &self.provider).nonces(account).call().await?)
    }

    async fn balance(&self, address: Address) -> Result<U256> {
        Ok(self.provider.get_balance(address).await?)
    }

    #[instrument(skip_all, fields(account = %call.account))]
    async fn estimate_execute(&self, call: &ExecuteCall) -> Result<u64> {
        let gas = IDelegatedAccount::new(call.account, &self.provider)
            .execute(call.intent.clone(), call.signature.clone())
            .from(self.relayer)
            .estimate_gas()
            .await?;
        debug!(gas, "Estimated execute gas");
        Ok(gas)
    }

    #[instrument(skip_all, fields(account = %call.account, gas_limit = gas_limit))]
    async fn send_execute(&self, call: &ExecuteCall, gas_limit: u64) -> Result<B256> {
        let pending = IDelegatedAccount::new(call.account, &self.provider)
            .execute(call.intent.clone(), call.signature.clone())
            .from(self.relayer)
            .gas(gas_limit)
            .send()
            .await?;
        Ok(*pending.tx_hash())
    }
}
