//! Relay execution.
//!
//! [`RelayExecutor::relay`] is a strict pipeline: every check must pass before the relayer spends
//! gas, and nothing is retried.

use crate::{
    chain::{Chain, ChainApi, ExecuteCall},
    config::RelayConfig,
    constants::MIN_HEALTHY_BALANCE,
    error::{IntentError, RelayError},
    gas::GasOracle,
    intent::IntentVerifier,
    signers::RelayerIdentity,
    time::unix_now,
    types::{
        IERC20, Intent, RelayRequest, RelayResponse, RelayTxStatus, parse_address,
        rpc::RelayStatus,
    },
};
use alloy::{
    primitives::{ChainId, U256, utils::format_ether},
    sol_types::SolCall,
};
use metrics::Counter;
use metrics_derive::Metrics;
use tracing::{debug, error, info, instrument, warn};

/// Message returned with every accepted relay.
const SUBMITTED_MESSAGE: &str = "Transaction submitted successfully";

/// Relay outcome counters.
#[derive(Metrics)]
#[metrics(scope = "relay")]
struct RelayMetrics {
    /// Number of relays broadcast.
    submitted: Counter,
    /// Number of relays rejected by validation.
    rejected: Counter,
    /// Number of relays that passed validation but failed to estimate or broadcast.
    failed: Counter,
}

/// Validates signed intents and broadcasts them from the relayer account.
#[derive(Debug)]
pub struct RelayExecutor {
    chain: Chain,
    gas: GasOracle,
    verifier: IntentVerifier,
    relayer: RelayerIdentity,
    chain_id: ChainId,
    max_gas_price: u128,
    execute_gas_buffer_percent: u64,
    metrics: RelayMetrics,
}

impl RelayExecutor {
    /// Create a new [`RelayExecutor`].
    pub fn new(
        chain: Chain,
        gas: GasOracle,
        verifier: IntentVerifier,
        relayer: RelayerIdentity,
        config: &RelayConfig,
    ) -> Self {
        Self {
            chain,
            gas,
            verifier,
            relayer,
            chain_id: config.chain.chain_id,
            max_gas_price: config.gas.max_gas_price_wei(),
            execute_gas_buffer_percent: config.gas.execute_gas_buffer_percent,
            metrics: RelayMetrics::default(),
        }
    }

    /// Validates `request` and broadcasts it, returning the transaction hash.
    #[instrument(skip_all, fields(user = %request.user_address, chain_id = request.chain_id))]
    pub async fn relay(&self, request: RelayRequest) -> Result<RelayResponse, RelayError> {
        self.relay_at(request, unix_now()).await
    }

    async fn relay_at(&self, request: RelayRequest, now: u64) -> Result<RelayResponse, RelayError> {
        let call = match self.validate(request, now).await {
            Ok(call) => call,
            Err(err) => {
                self.metrics.rejected.increment(1);
                warn!(%err, "Rejected relay request");
                return Err(err);
            }
        };

        self.execute(call).await.inspect_err(|_| self.metrics.failed.increment(1))
    }

    /// Runs every check that does not spend gas, in order.
    async fn validate(&self, request: RelayRequest, now: u64) -> Result<ExecuteCall, RelayError> {
        if request.chain_id != self.chain_id {
            return Err(RelayError::ChainMismatch { expected: self.chain_id, got: request.chain_id });
        }

        let intent = Intent::from(request.intent);
        if intent.deadline <= U256::from(now) {
            return Err(IntentError::DeadlineExpired { deadline: intent.deadline, now }.into());
        }

        let account = parse_address(&request.user_address)
            .ok_or_else(|| RelayError::invalid_address(&request.user_address))?;
        self.verifier.verify(account, &intent, &request.signature)?;

        let gas_price = self.gas.gas_price().await?;
        if !GasOracle::is_acceptable(gas_price, self.max_gas_price) {
            return Err(
                IntentError::GasPriceTooHigh { current: gas_price, max: self.max_gas_price }.into()
            );
        }

        Ok(ExecuteCall { account, intent, signature: request.signature })
    }

    /// Simulates and broadcasts a validated call.
    async fn execute(&self, call: ExecuteCall) -> Result<RelayResponse, RelayError> {
        if let Ok(transfer) = IERC20::transferCall::abi_decode(&call.intent.data) {
            debug!(
                token = %call.intent.destination,
                to = %transfer.to,
                amount = %transfer.amount,
                "Relaying token transfer"
            );
        }

        let estimated = match self.chain.estimate_execute(&call).await {
            Ok(estimated) => estimated,
            Err(err) => {
                error!(%err, account = %call.account, "Failed to estimate relay transaction");
                return Err(RelayError::GasEstimation(err));
            }
        };
        let gas_limit = with_buffer(estimated, self.execute_gas_buffer_percent);

        let tx_hash = match self.chain.send_execute(&call, gas_limit).await {
            Ok(tx_hash) => tx_hash,
            Err(err) => {
                error!(%err, account = %call.account, "Failed to broadcast relay transaction");
                return Err(RelayError::BroadcastFailed(err));
            }
        };

        self.metrics.submitted.increment(1);
        info!(
            %tx_hash,
            account = %call.account,
            nonce = %call.intent.nonce,
            gas_limit,
            "Relayed intent"
        );

        Ok(RelayResponse {
            tx_hash,
            status: RelayTxStatus::Submitted,
            message: Some(SUBMITTED_MESSAGE.to_string()),
        })
    }

    /// Returns the relayer's balance and whether it can keep paying gas.
    pub async fn status(&self) -> Result<RelayStatus, RelayError> {
        let relayer_address = self.relayer.address();
        let balance =
            self.chain.balance(relayer_address).await.map_err(RelayError::UpstreamUnavailable)?;

        Ok(RelayStatus {
            relayer_address,
            balance: format_ether(balance),
            chain_id: self.chain_id,
            healthy: balance > MIN_HEALTHY_BALANCE,
        })
    }
}

/// Adds `percent` on top of `gas`.
fn with_buffer(gas: u64, percent: u64) -> u64 {
    let buffered = (gas as u128).saturating_mul(100 + percent as u128) / 100;
    buffered.try_into().unwrap_or(u64::MAX)
}
