//! Relay spawn utilities.
use crate::{
    chain::{Chain, RpcChain},
    cli::Args,
    config::RelayConfig,
    metrics,
    rpc::Relay,
    signers::RelayerIdentity,
};
use alloy::{primitives::Address, providers::Provider};
use eyre::{Context, ensure};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, path::Path, sync::Arc};
use tokio::{net::TcpListener, task::JoinHandle};
use tracing::info;

/// Context returned once relay is launched.
#[derive(Debug)]
pub struct RelayHandle {
    /// The socket address to which the server is bound.
    pub local_addr: SocketAddr,
    /// The HTTP server task.
    pub server: JoinHandle<std::io::Result<()>>,
    /// The relayer account.
    pub relayer: Address,
    /// Metrics collector handle.
    pub metrics: PrometheusHandle,
}

/// Attempts to spawn the relay service using CLI arguments and a configuration file.
///
/// A missing configuration file is created from the defaults and the CLI values. Secrets are never
/// written to it.
pub async fn try_spawn_with_args<P: AsRef<Path>>(
    args: Args,
    config_path: P,
) -> eyre::Result<RelayHandle> {
    let config = if !config_path.as_ref().exists() {
        let config = args.merge_relay_config(RelayConfig::default());
        config.save_to_file(&config_path)?;
        config
    } else {
        // File exists: load and override with CLI values.
        args.merge_relay_config(RelayConfig::load_from_file(&config_path)?)
    };

    try_spawn(config).await
}

/// Spawns the relay service using the provided [`RelayConfig`].
pub async fn try_spawn(config: RelayConfig) -> eyre::Result<RelayHandle> {
    config.validate().wrap_err("invalid relay configuration")?;

    // load the relayer before touching the network
    let relayer = RelayerIdentity::from_secret_key(&config.secrets.relayer_key)?;
    let relayer_address = relayer.address();

    let rpc_chain = RpcChain::connect_http(config.chain.endpoint.clone(), &relayer);
    let remote_chain_id = rpc_chain
        .provider()
        .get_chain_id()
        .await
        .wrap_err_with(|| format!("failed to reach chain endpoint {}", config.chain.endpoint))?;
    ensure!(
        remote_chain_id == config.chain.chain_id,
        "chain endpoint serves chain {remote_chain_id}, configured chain is {}",
        config.chain.chain_id
    );
    let chain = Chain::from(Arc::new(rpc_chain));

    // setup metrics exporter and periodic metric collectors
    let metrics =
        metrics::setup_exporter((config.server.address, config.server.metrics_port)).await?;
    metrics::spawn_periodic_collectors(relayer_address, chain.clone(), config.chain.chain_id);

    let listener = TcpListener::bind((config.server.address, config.server.port))
        .await
        .wrap_err("failed to bind http listener")?;
    let local_addr = listener.local_addr()?;

    info!(relayer = %relayer_address, "Relayer account");
    info!(
        chain_id = config.chain.chain_id,
        delegated_account = %config.chain.delegated_account,
        fee_tokens = config.fee.tokens.len(),
        "Serving chain"
    );

    let max_connections = config.server.max_connections;
    let router = Relay::new(config, chain, relayer).into_router(max_connections);
    let server = tokio::spawn(async move { axum::serve(listener, router).await });
    info!(addr = %local_addr, "Started relay service");

    Ok(RelayHandle { local_addr, server, relayer: relayer_address, metrics })
}
