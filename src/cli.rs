//! # Relay CLI
use crate::{
    config::{FeeTokenConfig, RelayConfig},
    constants::DEFAULT_MAX_CONNECTIONS,
    spawn::try_spawn_with_args,
};
use alloy::primitives::{Address, ChainId};
use clap::Parser;
use eyre::Context;
use rust_decimal::Decimal;
use std::{
    net::{IpAddr, Ipv4Addr},
    path::PathBuf,
    time::Duration,
};
use url::Url;

/// The gasless relay pays gas for ERC20 transfers signed by EIP-7702 delegated accounts.
#[derive(Debug, Parser)]
#[command(author, version, about = "Gasless relay", long_about = None)]
pub struct Args {
    /// The configuration file.
    ///
    /// If missing, a default one will be used and stored in the working directory under
    /// `relay.yaml`.
    #[arg(long, value_name = "CONFIG", env = "RELAY_CONFIG", default_value = "relay.yaml")]
    pub config: PathBuf,
    /// The address to serve HTTP on.
    #[arg(long = "http.addr", value_name = "ADDR", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub address: IpAddr,
    /// The port to serve HTTP on.
    #[arg(long = "http.port", value_name = "PORT", default_value_t = 3000)]
    pub port: u16,
    /// The port to serve the metrics on.
    #[arg(long = "http.metrics-port", value_name = "PORT", default_value_t = 9000)]
    pub metrics_port: u16,
    /// The maximum number of requests served at once.
    #[arg(long = "max-connections", value_name = "NUM", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: usize,
    /// The RPC endpoint of the chain to send transactions to.
    ///
    /// Must be a valid HTTP or HTTPS URL pointing to an Ethereum JSON-RPC endpoint.
    #[arg(long = "endpoint", value_name = "RPC_ENDPOINT", env = "RELAY_RPC_URL")]
    pub endpoint: Option<Url>,
    /// The id of the chain the relay serves.
    #[arg(long = "chain-id", value_name = "CHAIN_ID")]
    pub chain_id: Option<ChainId>,
    /// The address of the delegated account implementation users sign intents for.
    #[arg(long = "delegated-account", value_name = "ADDRESS")]
    pub delegated_account: Option<Address>,
    /// A fee token the relay accepts, as `ADDRESS:DECIMALS[:USD_PRICE]`.
    #[arg(long = "fee-token", value_name = "TOKEN", value_parser = parse_fee_token)]
    pub fee_tokens: Vec<FeeTokenConfig>,
    /// The lifetime of a signed fee quote.
    #[arg(long, value_name = "SECONDS", value_parser = parse_duration_secs)]
    pub quote_ttl: Option<Duration>,
    /// The gas price above which relays are refused, in gwei.
    #[arg(long = "max-gas-price", value_name = "GWEI")]
    pub max_gas_price_gwei: Option<u64>,
    /// The secret key of the relayer account.
    #[arg(long, value_name = "SECRET_KEY", env = "RELAY_SK", hide_env_values = true)]
    pub secret_key: Option<String>,
    /// Reads all values from the config file.
    ///
    /// Only the secret key is taken from the command line or environment.
    #[arg(long = "config-only", default_value_t = false)]
    pub config_only: bool,
}

impl Args {
    /// Run the relayer service.
    pub async fn run(self) -> eyre::Result<()> {
        let config_path = self.config.clone();
        let handle = try_spawn_with_args(self, &config_path).await?;
        handle.server.await.wrap_err("http server task failed")??;

        Ok(())
    }

    /// Merges [`Args`] values into an existing [`RelayConfig`] instance.
    pub fn merge_relay_config(self, config: RelayConfig) -> RelayConfig {
        let config = config.with_relayer_key(self.secret_key);
        if self.config_only {
            return config;
        }

        config
            .with_address(self.address)
            .with_port(self.port)
            .with_metrics_port(self.metrics_port)
            .with_max_connections(self.max_connections)
            .with_endpoint(self.endpoint)
            .with_chain_id(self.chain_id)
            .with_delegated_account(self.delegated_account)
            .with_fee_tokens(self.fee_tokens)
            .with_quote_ttl(self.quote_ttl)
            .with_max_gas_price_gwei(self.max_gas_price_gwei)
    }
}

/// Parses a string representing seconds to a [`Duration`].
fn parse_duration_secs(arg: &str) -> Result<Duration, std::num::ParseIntError> {
    let seconds = arg.parse()?;
    Ok(Duration::from_secs(seconds))
}

/// Parses a fee token in a format of "address:decimals[:usd_price]".
fn parse_fee_token(arg: &str) -> eyre::Result<FeeTokenConfig> {
    let mut parts = arg.split(':');
    let address = parts.next().unwrap_or_default().parse::<Address>()?;
    let decimals = parts
        .next()
        .ok_or_else(|| eyre::eyre!("expected address:decimals[:usd_price]"))?
        .parse::<u8>()?;
    let usd_price = parts.next().map(str::parse::<Decimal>).transpose()?.unwrap_or(Decimal::ONE);
    eyre::ensure!(parts.next().is_none(), "expected address:decimals[:usd_price]");

    Ok(FeeTokenConfig { address, decimals, usd_price })
}
