//! Fee quoting.
//!
//! A quote converts the gas cost of a relayed transfer into the fee token and commits to it with
//! the relayer's EIP-712 signature. All arithmetic is on integers: prices are scaled by
//! [`PRICE_SCALE`] before they meet gas costs.

mod cache;
pub use cache::{QuoteCache, QuoteKey};

use crate::{
    config::{FeeConfig, FeeTokenConfig},
    constants::{NATIVE_DECIMALS, PRICE_SCALE},
    eip712::{fee_quote_digest, fee_quote_domain},
    error::{QuoteError, RelayError},
    gas::{GasOracle, TransferParams},
    signers::RelayerIdentity,
    time::unix_now,
    types::{FeeQuote, FeeQuoteDto},
};
use alloy::{
    primitives::{Address, ChainId, Signature, U256},
    sol_types::Eip712Domain,
};
use metrics::counter;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use tracing::{debug, instrument};

/// Computes, signs and verifies fee quotes.
#[derive(Debug)]
pub struct FeeQuoter {
    gas: GasOracle,
    relayer: RelayerIdentity,
    config: FeeConfig,
    domain: Eip712Domain,
    cache: QuoteCache,
}

impl FeeQuoter {
    /// Create a new [`FeeQuoter`] signing quotes as `relayer` on `chain_id`.
    pub fn new(
        gas: GasOracle,
        relayer: RelayerIdentity,
        config: FeeConfig,
        chain_id: ChainId,
    ) -> Self {
        let domain = fee_quote_domain(chain_id, relayer.address());
        Self { gas, relayer, config, domain, cache: QuoteCache::new() }
    }

    /// Returns the domain quotes are signed under.
    pub fn domain(&self) -> &Eip712Domain {
        &self.domain
    }

    /// Returns the quote cache.
    pub fn cache(&self) -> &QuoteCache {
        &self.cache
    }

    /// Quotes the fee for relaying `params`.
    ///
    /// Identical `(token, amount, recipient)` requests within the cache TTL get the same signed
    /// quote back.
    #[instrument(skip_all, fields(token = %params.token, amount = %params.amount))]
    pub async fn quote(&self, params: TransferParams) -> Result<FeeQuoteDto, RelayError> {
        self.cache.sweep();
        if params.amount.is_zero() {
            return Err(QuoteError::InvalidAmount("amount must be greater than zero".into()).into());
        }
        let token = self
            .config
            .token(&params.token)
            .ok_or(QuoteError::UnsupportedFeeToken(params.token))?;

        let key = QuoteKey { token: params.token, amount: params.amount, recipient: params.recipient };
        if let Some(quote) = self.cache.get(&key) {
            debug!("Serving cached fee quote");
            return Ok(quote);
        }

        let estimated_gas = self.gas.estimate_execute_gas(&params);
        let gas_price = self.gas.gas_price().await?;
        let fee_amount = self.fee_amount(token, gas_price, estimated_gas)?;
        let deadline = U256::from(unix_now().saturating_add(self.config.quote_ttl.as_secs()));

        let fee_quote = FeeQuote { feeToken: token.address, feeAmount: fee_amount, deadline };
        let signature = self.relayer.sign_typed_data(&self.domain, &fee_quote).await?;

        let quote = FeeQuoteDto {
            fee_amount,
            fee_token: token.address,
            deadline,
            signature: signature.as_bytes().into(),
            relayer_address: self.relayer.address(),
            buffer_percent: self.config.buffer_percent,
            estimated_gas: U256::from(estimated_gas),
            gas_price: U256::from(gas_price),
        };
        self.cache.put(key, quote.clone(), self.config.cache_ttl);
        counter!("relay_quotes_signed_total").increment(1);
        debug!(%fee_amount, gas_price, estimated_gas, %deadline, "Signed fee quote");

        Ok(quote)
    }

    /// Whether the quote is unexpired and was signed by this relayer.
    ///
    /// Never fails: malformed input is an invalid quote.
    pub fn verify(
        &self,
        fee_amount: U256,
        fee_token: Address,
        deadline: U256,
        signature: &[u8],
    ) -> bool {
        self.verify_at(fee_amount, fee_token, deadline, signature, unix_now())
    }

    fn verify_at(
        &self,
        fee_amount: U256,
        fee_token: Address,
        deadline: U256,
        signature: &[u8],
        now: u64,
    ) -> bool {
        if deadline <= U256::from(now) {
            return false;
        }
        let Ok(signature) = Signature::try_from(signature) else {
            return false;
        };

        let digest = fee_quote_digest(
            &FeeQuote { feeToken: fee_token, feeAmount: fee_amount, deadline },
            &self.domain,
        );
        signature
            .recover_address_from_prehash(&digest)
            .is_ok_and(|signer| signer == self.relayer.address())
    }

    /// Converts the gas cost into `token` units, clamped to the configured bounds.
    fn fee_amount(
        &self,
        token: &FeeTokenConfig,
        gas_price: u128,
        estimated_gas: u64,
    ) -> Result<U256, QuoteError> {
        let unavailable = || QuoteError::UnavailablePrice(token.address);

        let price_scaled =
            scaled_price(self.config.native_usd_price, token.usd_price).ok_or_else(unavailable)?;
        let min_fee = to_token_units(self.config.min_fee, token.decimals).ok_or_else(unavailable)?;
        let max_fee = to_token_units(self.config.max_fee, token.decimals).ok_or_else(unavailable)?;

        let gas_cost = U256::from(gas_price).saturating_mul(U256::from(estimated_gas));
        let fee = convert_gas_cost(gas_cost, price_scaled, token.decimals, self.config.buffer_percent);

        Ok(fee.max(min_fee).min(max_fee))
    }
}

/// Converts a native gas cost in wei into token units, adding `buffer_percent`.
///
/// `gasCost * priceScaled * 10^tokenDecimals * (100 + buffer) / (10^18 * PRICE_SCALE * 100)`
pub fn convert_gas_cost(
    gas_cost: U256,
    price_scaled: U256,
    token_decimals: u8,
    buffer_percent: u64,
) -> U256 {
    let numerator = gas_cost
        .saturating_mul(price_scaled)
        .saturating_mul(pow10(token_decimals))
        .saturating_mul(U256::from(100u64.saturating_add(buffer_percent)));
    let denominator = pow10(NATIVE_DECIMALS) * U256::from(PRICE_SCALE) * U256::from(100);
    numerator / denominator
}

/// Returns the native/token price ratio scaled by [`PRICE_SCALE`].
fn scaled_price(native_usd_price: Decimal, token_usd_price: Decimal) -> Option<U256> {
    let ratio = native_usd_price
        .checked_mul(Decimal::from(PRICE_SCALE))?
        .checked_div(token_usd_price)?
        .trunc();
    ratio.to_u128().map(U256::from)
}

/// Converts a whole-token amount into the token's smallest unit, truncating sub-unit dust.
fn to_token_units(amount: Decimal, decimals: u8) -> Option<U256> {
    let scale = 10u64.checked_pow(decimals as u32)?;
    amount.checked_mul(Decimal::from(scale))?.trunc().to_u128().map(U256::from)
}

fn pow10(exp: u8) -> U256 {
    U256::from(10).pow(U256::from(exp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chain::InMemoryChain,
        constants::{DEFAULT_EXECUTE_GAS, GWEI_TO_WEI},
    };
    use alloy::primitives::{Bytes, address};
    use std::{sync::Arc, time::Duration};

    const USDC: Address = address!("0x1111111111111111111111111111111111111111");
    const RECIPIENT: Address = address!("0x3333333333333333333333333333333333333333");
    const ANVIL_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn config() -> FeeConfig {
        FeeConfig {
            tokens: vec![FeeTokenConfig { address: USDC, decimals: 6, usd_price: Decimal::ONE }],
            native_usd_price: Decimal::from(500),
            buffer_percent: 20,
            min_fee: Decimal::new(1, 2),
            max_fee: Decimal::new(100, 2),
            ..Default::default()
        }
    }

    fn quoter(chain: &Arc<InMemoryChain>, config: FeeConfig) -> FeeQuoter {
        let relayer = RelayerIdentity::from_secret_key(ANVIL_KEY).unwrap();
        FeeQuoter::new(
            GasOracle::new(chain.clone().into(), DEFAULT_EXECUTE_GAS),
            relayer,
            config,
            5887,
        )
    }

    fn params(amount: u64) -> TransferParams {
        TransferParams { token: USDC, amount: U256::from(amount), recipient: RECIPIENT, sender: None }
    }

    #[test]
    fn converts_gas_cost() {
        // 10 gwei * 150k gas = 0.0015 native, at 500 USD/native and 20% buffer
        let gas_cost = U256::from(10 * GWEI_TO_WEI) * U256::from(150_000);
        let fee = convert_gas_cost(gas_cost, U256::from(500 * PRICE_SCALE), 6, 20);
        assert_eq!(fee, U256::from(900_000));

        assert_eq!(convert_gas_cost(gas_cost, U256::from(500 * PRICE_SCALE), 6, 0), U256::from(750_000));
        assert_eq!(convert_gas_cost(U256::ZERO, U256::from(PRICE_SCALE), 6, 20), U256::ZERO);
        // saturates instead of overflowing
        assert!(convert_gas_cost(U256::MAX, U256::MAX, 18, 20) > U256::ZERO);
    }

    #[test]
    fn converts_prices() {
        assert_eq!(scaled_price(Decimal::from(500), Decimal::ONE), Some(U256::from(500_000_000)));
        assert_eq!(
            scaled_price(Decimal::new(25, 2), Decimal::TWO),
            Some(U256::from(125_000))
        );
        assert_eq!(scaled_price(Decimal::ONE, Decimal::ZERO), None);

        assert_eq!(to_token_units(Decimal::new(1, 2), 6), Some(U256::from(10_000)));
        assert_eq!(to_token_units(Decimal::ONE, 18), Some(U256::from(10u128.pow(18))));
        assert_eq!(to_token_units(Decimal::ONE, 40), None);
    }

    #[tokio::test]
    async fn quotes_within_bounds() {
        let chain = Arc::new(InMemoryChain::default());
        chain.set_gas_price(Some(10 * GWEI_TO_WEI));
        let quoter = quoter(&chain, config());

        let quote = quoter.quote(params(1_000_000)).await.unwrap();
        assert_eq!(quote.fee_amount, U256::from(900_000));
        assert_eq!(quote.fee_token, USDC);
        assert_eq!(quote.buffer_percent, 20);
        assert_eq!(quote.estimated_gas, U256::from(DEFAULT_EXECUTE_GAS));
        assert_eq!(quote.gas_price, U256::from(10 * GWEI_TO_WEI));
        assert_eq!(quote.relayer_address, quoter.relayer.address());
        assert!(quote.fee_amount >= U256::from(10_000) && quote.fee_amount <= U256::from(1_000_000));
    }

    #[tokio::test]
    async fn clamps_to_min_and_max_fee() {
        let chain = Arc::new(InMemoryChain::default());
        let quoter = quoter(&chain, FeeConfig { cache_ttl: Duration::ZERO, ..config() });

        chain.set_gas_price(Some(1));
        assert_eq!(quoter.quote(params(1)).await.unwrap().fee_amount, U256::from(10_000));

        chain.set_gas_price(Some(u128::MAX));
        assert_eq!(quoter.quote(params(1)).await.unwrap().fee_amount, U256::from(1_000_000));
    }

    #[tokio::test]
    async fn caches_identical_requests() {
        let chain = Arc::new(InMemoryChain::default());
        chain.set_gas_price(Some(10 * GWEI_TO_WEI));
        let quoter = quoter(&chain, config());

        let first = quoter.quote(params(5)).await.unwrap();
        chain.set_gas_price(Some(20 * GWEI_TO_WEI));
        let second =
            quoter.quote(TransferParams { sender: Some(Address::repeat_byte(9)), ..params(5) })
                .await
                .unwrap();

        assert_eq!(first, second);
        assert_eq!(chain.gas_price_reads(), 1);

        // a different amount is a different key
        let third = quoter.quote(params(6)).await.unwrap();
        assert_ne!(third.fee_amount, first.fee_amount);
        assert_eq!(chain.gas_price_reads(), 2);
    }

    #[tokio::test]
    async fn expired_cache_entries_are_requoted() {
        let chain = Arc::new(InMemoryChain::default());
        chain.set_gas_price(Some(10 * GWEI_TO_WEI));
        let quoter = quoter(&chain, FeeConfig { cache_ttl: Duration::ZERO, ..config() });

        let first = quoter.quote(params(5)).await.unwrap();
        chain.set_gas_price(Some(5 * GWEI_TO_WEI));
        let second = quoter.quote(params(5)).await.unwrap();

        assert_eq!(chain.gas_price_reads(), 2);
        assert_ne!(first.fee_amount, second.fee_amount);
        assert_ne!(first.signature, second.signature);
        // the sweep on the second call evicted the first entry
        assert_eq!(quoter.cache().len(), 1);
    }

    #[tokio::test]
    async fn rejected_quotes_still_evict_expired_entries() {
        let chain = Arc::new(InMemoryChain::default());
        let quoter = quoter(&chain, FeeConfig { cache_ttl: Duration::ZERO, ..config() });

        quoter.quote(params(5)).await.unwrap();
        assert_eq!(quoter.cache().len(), 1);

        quoter.quote(params(0)).await.unwrap_err();
        assert!(quoter.cache().is_empty());
    }

    #[tokio::test]
    async fn rejects_unsupported_token_and_zero_amount() {
        let chain = Arc::new(InMemoryChain::default());
        let quoter = quoter(&chain, config());

        let err = quoter
            .quote(TransferParams { token: Address::repeat_byte(7), ..params(1) })
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Quote(QuoteError::UnsupportedFeeToken(_))));

        let err = quoter.quote(params(0)).await.unwrap_err();
        assert!(matches!(err, RelayError::Quote(QuoteError::InvalidAmount(_))));
        assert_eq!(chain.gas_price_reads(), 0);
    }

    #[tokio::test]
    async fn gas_price_failure_propagates() {
        let chain = Arc::new(InMemoryChain::default());
        chain.set_gas_price(None);
        let quoter = quoter(&chain, config());

        let err = quoter.quote(params(1)).await.unwrap_err();
        assert!(matches!(err, RelayError::UpstreamUnavailable(_)));
        assert!(quoter.cache().is_empty());
    }

    #[tokio::test]
    async fn signed_quote_verifies() {
        let chain = Arc::new(InMemoryChain::default());
        let quoter = quoter(&chain, config());
        let quote = quoter.quote(params(1)).await.unwrap();

        assert!(quoter.verify(quote.fee_amount, quote.fee_token, quote.deadline, &quote.signature));
        let signature = Signature::try_from(quote.signature.as_ref()).unwrap();
        let digest = fee_quote_digest(&quote.fee_quote(), quoter.domain());
        assert_eq!(
            signature.recover_address_from_prehash(&digest).unwrap(),
            quote.relayer_address
        );

        // any mutated field invalidates the signature
        assert!(!quoter.verify(
            quote.fee_amount + U256::from(1),
            quote.fee_token,
            quote.deadline,
            &quote.signature
        ));
        assert!(!quoter.verify(
            quote.fee_amount,
            Address::repeat_byte(7),
            quote.deadline,
            &quote.signature
        ));
        assert!(!quoter.verify(
            quote.fee_amount,
            quote.fee_token,
            quote.deadline + U256::from(1),
            &quote.signature
        ));
    }

    #[tokio::test]
    async fn verify_deadline_boundary() {
        let chain = Arc::new(InMemoryChain::default());
        let quoter = quoter(&chain, config());
        let deadline = U256::from(1_900_000_000u64);
        let fee = U256::from(10_000);

        let signature = quoter
            .relayer
            .sign_typed_data(
                quoter.domain(),
                &FeeQuote { feeToken: USDC, feeAmount: fee, deadline },
            )
            .await
            .unwrap()
            .as_bytes();

        assert!(quoter.verify_at(fee, USDC, deadline, &signature, 1_899_999_999));
        assert!(!quoter.verify_at(fee, USDC, deadline, &signature, 1_900_000_000));
        assert!(!quoter.verify_at(fee, USDC, deadline, &signature, 1_900_000_001));
    }

    #[tokio::test]
    async fn verify_never_fails_on_garbage() {
        let chain = Arc::new(InMemoryChain::default());
        let quoter = quoter(&chain, config());
        let deadline = U256::from(u64::MAX);

        assert!(!quoter.verify(U256::from(1), USDC, deadline, &[]));
        assert!(!quoter.verify(U256::from(1), USDC, deadline, &[0u8; 65]));
        assert!(!quoter.verify(U256::from(1), USDC, deadline, &Bytes::from_static(&[0xff; 70])));
    }

    #[tokio::test]
    async fn quote_from_other_signer_is_invalid() {
        let chain = Arc::new(InMemoryChain::default());
        let quoter = quoter(&chain, config());
        let deadline = U256::from(u64::MAX);
        let fee = U256::from(10_000);

        let other = RelayerIdentity::new(alloy::signers::local::PrivateKeySigner::random());
        let signature = other
            .sign_typed_data(quoter.domain(), &FeeQuote { feeToken: USDC, feeAmount: fee, deadline })
            .await
            .unwrap();
        assert!(!quoter.verify(fee, USDC, deadline, &signature.as_bytes()));
    }
}
