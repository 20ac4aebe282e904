//! Chain access.
//!
//! Everything the relay needs from the chain goes through [`ChainApi`]: reading gas price, code,
//! balances and the delegated account nonce, and simulating or broadcasting `execute`.

mod memory;
pub use memory::{InMemoryChain, SentExecute};

mod rpc;
pub use rpc::RpcChain;

use crate::{error::ChainError, types::Intent};
use alloy::primitives::{Address, B256, Bytes, U256};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

/// Type alias for `Result<T, ChainError>`
pub type Result<T> = core::result::Result<T, ChainError>;

/// A call to `execute` on a user's delegated account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteCall {
    /// The user's EOA, which carries the delegated code.
    pub account: Address,
    /// The signed intent.
    pub intent: Intent,
    /// The user's signature over the intent digest.
    pub signature: Bytes,
}

/// Chain API.
#[async_trait]
pub trait ChainApi: Debug + Send + Sync {
    /// Returns the current network gas price in wei.
    async fn gas_price(&self) -> Result<u128>;

    /// Returns the code at `address`.
    async fn code_at(&self, address: Address) -> Result<Bytes>;

    /// Reads `nonces(account)` from the delegated code at `account` itself.
    async fn delegated_nonce(&self, account: Address) -> Result<U256>;

    /// Returns the native balance of `address`.
    async fn balance(&self, address: Address) -> Result<U256>;

    /// Estimates the gas of `call` sent by the relayer.
    async fn estimate_execute(&self, call: &ExecuteCall) -> Result<u64>;

    /// Signs and broadcasts `call` from the relayer, returning the transaction hash.
    async fn send_execute(&self, call: &ExecuteCall, gas_limit: u64) -> Result<B256>;
}

/// Chain interface shared by the relay components.
#[derive(Debug, Clone)]
pub struct Chain {
    inner: Arc<dyn ChainApi>,
}

impl<T: ChainApi + 'static> From<Arc<T>> for Chain {
    fn from(api: Arc<T>) -> Self {
        Self { inner: api }
    }
}

#[async_trait]
impl ChainApi for Chain {
    async fn gas_price(&self) -> Result<u128> {
        self.inner.gas_price().await
    }

    async fn code_at(&self, address: Address) -> Result<Bytes> {
        self.inner.code_at(address).await
    }

    async fn delegated_nonce(&self, account: Address) -> Result<U256> {
        self.inner.delegated_nonce(account).await
    }

    async fn balance(&self, address: Address) -> Result<U256> {
        self.inner.balance(address).await
    }

    async fn estimate_execute(&self, call: &ExecuteCall) -> Result<u64> {
        self.inner.estimate_execute(call).await
    }

    async fn send_execute(&self, call: &ExecuteCall, gas_limit: u64) -> Result<B256> {
        self.inner.send_execute(call, gas_limit).await
    }
}
