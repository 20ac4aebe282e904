//! [`ChainApi`] implementation in-memory. For testing only.

use super::{ChainApi, ExecuteCall, Result};
use crate::error::ChainError;
use alloy::{
    primitives::{Address, B256, Bytes, U256, keccak256},
    sol_types::SolValue,
};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// A broadcast recorded by [`InMemoryChain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentExecute {
    /// The broadcast call.
    pub call: ExecuteCall,
    /// Gas limit the call was sent with.
    pub gas_limit: u64,
    /// The returned transaction hash.
    pub tx_hash: B256,
}

/// Scriptable chain state that records every read.
#[derive(Debug)]
pub struct InMemoryChain {
    gas_price: Mutex<Option<u128>>,
    execute_gas: Mutex<Option<u64>>,
    code: DashMap<Address, Bytes>,
    nonces: DashMap<Address, U256>,
    balances: DashMap<Address, U256>,
    fail_code_reads: AtomicBool,
    fail_nonce_reads: AtomicBool,
    fail_broadcast: AtomicBool,
    gas_price_reads: AtomicUsize,
    code_reads: Mutex<Vec<Address>>,
    nonce_reads: Mutex<Vec<Address>>,
    sent: Mutex<Vec<SentExecute>>,
}

impl Default for InMemoryChain {
    fn default() -> Self {
        Self {
            gas_price: Mutex::new(Some(1_000_000_000)),
            execute_gas: Mutex::new(Some(120_000)),
            code: Default::default(),
            nonces: Default::default(),
            balances: Default::default(),
            fail_code_reads: Default::default(),
            fail_nonce_reads: Default::default(),
            fail_broadcast: Default::default(),
            gas_price_reads: Default::default(),
            code_reads: Default::default(),
            nonce_reads: Default::default(),
            sent: Default::default(),
        }
    }
}

impl InMemoryChain {
    /// Sets the gas price, or makes gas price reads fail with `None`.
    pub fn set_gas_price(&self, gas_price: Option<u128>) {
        *self.gas_price.lock() = gas_price;
    }

    /// Sets the `execute` gas estimate, or makes estimation fail with `None`.
    pub fn set_execute_gas(&self, gas: Option<u64>) {
        *self.execute_gas.lock() = gas;
    }

    /// Sets the code at `address`.
    pub fn set_code(&self, address: Address, code: Bytes) {
        self.code.insert(address, code);
    }

    /// Sets the delegated account nonce of `account`.
    pub fn set_nonce(&self, account: Address, nonce: U256) {
        self.nonces.insert(account, nonce);
    }

    /// Sets the native balance of `address`.
    pub fn set_balance(&self, address: Address, balance: U256) {
        self.balances.insert(address, balance);
    }

    /// Makes code reads fail.
    pub fn fail_code_reads(&self, fail: bool) {
        self.fail_code_reads.store(fail, Ordering::Relaxed);
    }

    /// Makes delegated nonce reads revert.
    pub fn fail_nonce_reads(&self, fail: bool) {
        self.fail_nonce_reads.store(fail, Ordering::Relaxed);
    }

    /// Makes broadcasts fail.
    pub fn fail_broadcast(&self, fail: bool) {
        self.fail_broadcast.store(fail, Ordering::Relaxed);
    }

    /// Number of gas price reads so far.
    pub fn gas_price_reads(&self) -> usize {
        self.gas_price_reads.load(Ordering::Relaxed)
    }

    /// Addresses whose code was read, in order.
    pub fn code_reads(&self) -> Vec<Address> {
        self.code_reads.lock().clone()
    }

    /// Accounts whose delegated nonce was read, in order.
    pub fn nonce_reads(&self) -> Vec<Address> {
        self.nonce_reads.lock().clone()
    }

    /// Broadcast calls, in order.
    pub fn sent(&self) -> Vec<SentExecute> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl ChainApi for InMemoryChain {
    async fn gas_price(&self) -> Result<u128> {
        self.gas_price_reads.fetch_add(1, Ordering::Relaxed);
        (*self.gas_price.lock()).ok_or_else(|| unavailable("eth_gasPrice"))
    }

    async fn code_at(&self, address: Address) -> Result<Bytes> {
        self.code_reads.lock().push(address);
        if self.fail_code_reads.load(Ordering::Relaxed) {
            return Err(unavailable("eth_getCode"));
        }
        Ok(self.code.get(&address).map(|code| code.value().clone()).unwrap_or_default())
    }

    async fn delegated_nonce(&self, account: Address) -> Result<U256> {
        self.nonce_reads.lock().push(account);
        if self.fail_nonce_reads.load(Ordering::Relaxed) {
            return Err(unavailable("execution reverted"));
        }
        Ok(self.nonces.get(&account).map(|nonce| *nonce.value()).unwrap_or_default())
    }

    async fn balance(&self, address: Address) -> Result<U256> {
        Ok(self.balances.get(&address).map(|balance| *balance.value()).unwrap_or_default())
    }

    async fn estimate_execute(&self, _call: &ExecuteCall) -> Result<u64> {
        (*self.execute_gas.lock()).ok_or_else(|| unavailable("execution reverted"))
    }

    async fn send_execute(&self, call: &ExecuteCall, gas_limit: u64) -> Result<B256> {
        if self.fail_broadcast.load(Ordering::Relaxed) {
            return Err(unavailable("insufficient funds for gas * price + value"));
        }

        let mut sent = self.sent.lock();
        let tx_hash = keccak256(
            (call.account, call.intent.clone(), call.signature.clone(), U256::from(sent.len()))
                .abi_encode(),
        );
        sent.push(SentExecute { call: call.clone(), gas_limit, tx_hash });
        Ok(tx_hash)
    }
}

fn unavailable(reason: &str) -> ChainError {
    ChainError::Unavailable(reason.to_string())
}
