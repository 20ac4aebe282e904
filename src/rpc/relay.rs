//! The relay service behind the HTTP routes.

use crate::{
    chain::Chain,
    config::RelayConfig,
    error::{QuoteError, RelayError},
    fees::FeeQuoter,
    gas::{GasOracle, TransferParams},
    intent::IntentVerifier,
    nonce::NonceResolver,
    relay::RelayExecutor,
    serde::decimal::parse_u256,
    signers::RelayerIdentity,
    types::{
        FeeQuoteDto, RelayRequest, RelayResponse, VerifyFeeQuoteRequest, VerifyFeeQuoteResponse,
        parse_address,
        rpc::{FeeQuoteParams, Health, HealthStatus, NonceParams, NonceResponse, RelayStatus},
    },
    version::RELAY_SHORT_VERSION,
};
use alloy::primitives::{Address, ChainId};
use std::sync::Arc;
use tracing::error;

/// Implementation of the relay endpoints.
///
/// Cheap to clone: every handler gets its own copy.
#[derive(Debug, Clone)]
pub struct Relay {
    inner: Arc<RelayInner>,
}

#[derive(Debug)]
struct RelayInner {
    /// Signs and verifies fee quotes.
    fees: FeeQuoter,
    /// Resolves account nonces.
    nonces: NonceResolver,
    /// Validates and broadcasts intents.
    executor: RelayExecutor,
}

impl Relay {
    /// Wires up the relay components from `config`.
    ///
    /// `config` is expected to be validated.
    pub fn new(config: RelayConfig, chain: Chain, relayer: RelayerIdentity) -> Self {
        let chain_id = config.chain.chain_id;
        let gas = GasOracle::new(chain.clone(), config.gas.execute_gas);
        let verifier = IntentVerifier::new(chain_id, config.chain.delegated_account);

        let inner = RelayInner {
            fees: FeeQuoter::new(gas.clone(), relayer.clone(), config.fee.clone(), chain_id),
            nonces: NonceResolver::new(chain.clone(), chain_id),
            executor: RelayExecutor::new(chain, gas, verifier, relayer, &config),
        };
        Self { inner: Arc::new(inner) }
    }

    /// `GET /fees/quote`
    pub async fn quote_fee(&self, params: FeeQuoteParams) -> Result<FeeQuoteDto, RelayError> {
        let token = required_address("token", params.token.as_deref())?;
        let recipient = required_address("recipient", params.recipient.as_deref())?;
        let amount = params
            .amount
            .as_deref()
            .ok_or_else(|| RelayError::InvalidParams("amount is required".into()))?;
        let amount = parse_u256(amount).map_err(QuoteError::InvalidAmount)?;
        let sender = params
            .sender
            .as_deref()
            .map(|sender| parse_address(sender).ok_or_else(|| RelayError::invalid_address(sender)))
            .transpose()?;

        self.inner.fees.quote(TransferParams { token, amount, recipient, sender }).await
    }

    /// `POST /fees/verify`
    pub fn verify_fee_quote(&self, request: VerifyFeeQuoteRequest) -> VerifyFeeQuoteResponse {
        let valid = self.inner.fees.verify(
            request.fee_amount,
            request.fee_token,
            request.deadline,
            &request.signature,
        );
        VerifyFeeQuoteResponse { valid }
    }

    /// `GET /nonce/{address}`
    pub async fn get_nonce(
        &self,
        address: &str,
        params: NonceParams,
    ) -> Result<NonceResponse, RelayError> {
        let chain_id = params
            .chain_id
            .as_deref()
            .map(|chain_id| {
                chain_id
                    .trim()
                    .parse::<ChainId>()
                    .map_err(|_| RelayError::InvalidParams(format!("Invalid chain id: {chain_id}")))
            })
            .transpose()?;

        let (address, nonce) = self.inner.nonces.get_nonce(address, chain_id).await?;
        Ok(NonceResponse { nonce, address })
    }

    /// `POST /relay`
    pub async fn relay(&self, request: RelayRequest) -> Result<RelayResponse, RelayError> {
        self.inner.executor.relay(request).await
    }

    /// `GET /relay/status`
    pub async fn relay_status(&self) -> Result<RelayStatus, RelayError> {
        self.inner.executor.status().await
    }

    /// `GET /health`
    ///
    /// Always answers: an unreachable chain or an underfunded relayer is reported as degraded.
    pub async fn health(&self) -> Health {
        let status = match self.inner.executor.status().await {
            Ok(status) if status.healthy => HealthStatus::Ok,
            Ok(_) => HealthStatus::Degraded,
            Err(err) => {
                error!(%err, "Failed to read relayer balance for health check");
                HealthStatus::Degraded
            }
        };
        Health { status, version: RELAY_SHORT_VERSION.to_string() }
    }
}

/// Parses a mandatory address parameter.
fn required_address(name: &str, value: Option<&str>) -> Result<Address, RelayError> {
    let value = value.ok_or_else(|| RelayError::InvalidParams(format!("{name} is required")))?;
    parse_address(value).ok_or_else(|| RelayError::invalid_address(value))
}
