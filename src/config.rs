//! Relay configuration.
use crate::constants::{
    DEFAULT_EXECUTE_GAS, DEFAULT_EXECUTE_GAS_BUFFER_PERCENT, DEFAULT_FEE_BUFFER_PERCENT,
    DEFAULT_MAX_CONNECTIONS, DEFAULT_MAX_GAS_PRICE_GWEI, DEFAULT_QUOTE_TTL, GWEI_TO_WEI,
    QUOTE_CACHE_TTL,
};
use alloy::primitives::{Address, ChainId};
use eyre::{Context, ensure};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{
    net::{IpAddr, Ipv4Addr},
    path::Path,
    time::Duration,
};
use url::Url;

/// Relay configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Chain configuration.
    pub chain: ChainConfig,
    /// Fee quote configuration.
    #[serde(default)]
    pub fee: FeeConfig,
    /// Gas configuration.
    #[serde(default)]
    pub gas: GasConfig,
    /// Secrets.
    #[serde(skip_serializing, default)]
    pub secrets: SecretsConfig,
}

impl RelayConfig {
    /// Sets the IP address to serve HTTP on.
    pub fn with_address(mut self, address: IpAddr) -> Self {
        self.server.address = address;
        self
    }

    /// Sets the port to serve HTTP on.
    pub fn with_port(mut self, port: u16) -> Self {
        self.server.port = port;
        self
    }

    /// Sets the port to serve the metrics on.
    pub fn with_metrics_port(mut self, port: u16) -> Self {
        self.server.metrics_port = port;
        self
    }

    /// Sets the maximum number of in-flight requests.
    pub fn with_max_connections(mut self, max_connections: usize) -> Self {
        self.server.max_connections = max_connections;
        self
    }

    /// Sets the RPC endpoint of the chain.
    pub fn with_endpoint(mut self, endpoint: Option<Url>) -> Self {
        if let Some(endpoint) = endpoint {
            self.chain.endpoint = endpoint;
        }
        self
    }

    /// Sets the served chain id.
    pub fn with_chain_id(mut self, chain_id: Option<ChainId>) -> Self {
        if let Some(chain_id) = chain_id {
            self.chain.chain_id = chain_id;
        }
        self
    }

    /// Sets the delegated account implementation address.
    pub fn with_delegated_account(mut self, delegated_account: Option<Address>) -> Self {
        if let Some(delegated_account) = delegated_account {
            self.chain.delegated_account = delegated_account;
        }
        self
    }

    /// Adds fee tokens, replacing configured tokens with the same address.
    pub fn with_fee_tokens(mut self, tokens: impl IntoIterator<Item = FeeTokenConfig>) -> Self {
        for token in tokens {
            self.fee.tokens.retain(|existing| existing.address != token.address);
            self.fee.tokens.push(token);
        }
        self
    }

    /// Sets the lifetime of signed fee quotes.
    pub fn with_quote_ttl(mut self, quote_ttl: Option<Duration>) -> Self {
        if let Some(quote_ttl) = quote_ttl {
            self.fee.quote_ttl = quote_ttl;
        }
        self
    }

    /// Sets the gas price ceiling in gwei.
    pub fn with_max_gas_price_gwei(mut self, max_gas_price_gwei: Option<u64>) -> Self {
        if let Some(max_gas_price_gwei) = max_gas_price_gwei {
            self.gas.max_gas_price_gwei = max_gas_price_gwei;
        }
        self
    }

    /// Sets the relayer secret key.
    pub fn with_relayer_key(mut self, relayer_key: Option<String>) -> Self {
        if let Some(relayer_key) = relayer_key {
            self.secrets.relayer_key = relayer_key;
        }
        self
    }

    /// Checks the configuration for values the relay cannot run with.
    pub fn validate(&self) -> eyre::Result<()> {
        ensure!(self.chain.chain_id != 0, "chain id must not be zero");
        ensure!(
            !self.chain.delegated_account.is_zero(),
            "delegated account address must be configured"
        );
        ensure!(!self.fee.tokens.is_empty(), "at least one fee token must be configured");
        ensure!(
            self.fee.min_fee >= Decimal::ZERO && self.fee.min_fee <= self.fee.max_fee,
            "min fee {} must be between 0 and max fee {}",
            self.fee.min_fee,
            self.fee.max_fee
        );
        ensure!(self.fee.native_usd_price > Decimal::ZERO, "native USD price must be positive");
        for token in &self.fee.tokens {
            ensure!(
                token.usd_price > Decimal::ZERO,
                "USD price of fee token {} must be positive",
                token.address
            );
        }
        ensure!(!self.fee.quote_ttl.is_zero(), "quote ttl must not be zero");
        ensure!(self.gas.execute_gas > 0, "execute gas estimate must not be zero");
        Ok(())
    }

    /// Load from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> eyre::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .wrap_err_with(|| format!("failed to read config file: {}", path.display()))?;
        let config = serde_yaml::from_reader(&file)
            .wrap_err_with(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save to a YAML file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> eyre::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// The address to serve HTTP on.
    pub address: IpAddr,
    /// The port to serve HTTP on.
    pub port: u16,
    /// The port to serve the metrics on.
    pub metrics_port: u16,
    /// The maximum number of in-flight requests.
    pub max_connections: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            metrics_port: 9000,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

/// Chain configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    /// The RPC endpoint of the chain.
    pub endpoint: Url,
    /// The served chain.
    pub chain_id: ChainId,
    /// The delegated account implementation, the `verifyingContract` of user intents.
    pub delegated_account: Address,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse("http://localhost:8545").expect("valid url"),
            chain_id: 1,
            delegated_account: Address::ZERO,
        }
    }
}

/// A token fees can be paid in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeTokenConfig {
    /// Token address.
    pub address: Address,
    /// Token decimals.
    pub decimals: u8,
    /// Token price in USD.
    #[serde(default = "default_usd_price")]
    pub usd_price: Decimal,
}

fn default_usd_price() -> Decimal {
    Decimal::ONE
}

/// Fee quote configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeConfig {
    /// Accepted fee tokens.
    #[serde(default)]
    pub tokens: Vec<FeeTokenConfig>,
    /// Price of the native currency in USD.
    pub native_usd_price: Decimal,
    /// Percentage added on top of the converted gas cost.
    pub buffer_percent: u64,
    /// Minimum fee, in whole tokens.
    pub min_fee: Decimal,
    /// Maximum fee, in whole tokens.
    pub max_fee: Decimal,
    /// The lifetime of a signed fee quote.
    #[serde(with = "crate::serde::duration")]
    pub quote_ttl: Duration,
    /// How long a signed quote is served from cache.
    #[serde(with = "crate::serde::duration")]
    pub cache_ttl: Duration,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            tokens: Vec::new(),
            native_usd_price: Decimal::ONE,
            buffer_percent: DEFAULT_FEE_BUFFER_PERCENT,
            min_fee: Decimal::new(1, 2),
            max_fee: Decimal::ONE,
            quote_ttl: DEFAULT_QUOTE_TTL,
            cache_ttl: QUOTE_CACHE_TTL,
        }
    }
}

impl FeeConfig {
    /// Returns the accepted fee token at `address`.
    pub fn token(&self, address: &Address) -> Option<&FeeTokenConfig> {
        self.tokens.iter().find(|token| token.address == *address)
    }
}

/// Gas configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasConfig {
    /// Static gas estimate of a delegated transfer, used for quoting.
    pub execute_gas: u64,
    /// Percentage added to the simulated gas of a relayed `execute`.
    pub execute_gas_buffer_percent: u64,
    /// Gas price ceiling in gwei.
    pub max_gas_price_gwei: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            execute_gas: DEFAULT_EXECUTE_GAS,
            execute_gas_buffer_percent: DEFAULT_EXECUTE_GAS_BUFFER_PERCENT,
            max_gas_price_gwei: DEFAULT_MAX_GAS_PRICE_GWEI,
        }
    }
}

impl GasConfig {
    /// Returns the gas price ceiling in wei.
    pub fn max_gas_price_wei(&self) -> u128 {
        self.max_gas_price_gwei as u128 * GWEI_TO_WEI
    }
}

/// Secrets (kept out of serialized output).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretsConfig {
    /// The relayer's secret key.
    #[serde(default)]
    pub relayer_key: String,
}
