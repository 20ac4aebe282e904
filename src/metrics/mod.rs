//! Metrics exporter and collectors.

mod periodic;
pub use periodic::spawn_periodic_collectors;

use eyre::Context;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use parking_lot::Mutex;
use std::{net::SocketAddr, time::Duration};

/// Installs a Prometheus recorder serving on `metrics_addr`, returning a handle.
///
/// The recorder performs upkeep every 5 seconds. Repeated calls return the handle of the first
/// recorder.
pub async fn setup_exporter(
    metrics_addr: impl Into<SocketAddr>,
) -> eyre::Result<PrometheusHandle> {
    static HANDLE: Mutex<Option<PrometheusHandle>> = Mutex::new(None);

    let mut lock = HANDLE.lock();
    if let Some(handle) = &*lock {
        return Ok(handle.clone());
    }

    let addr: SocketAddr = metrics_addr.into();
    let (recorder, exporter) = PrometheusBuilder::new()
        .with_http_listener(addr)
        .upkeep_timeout(Duration::from_secs(5))
        .build()
        .wrap_err("failed to build metrics recorder")?;

    let handle = recorder.handle();
    metrics::set_global_recorder(recorder).wrap_err("could not set metrics recorder")?;
    tokio::spawn(exporter);

    tracing::info!(target: "relay::spawn", %addr, "Started metrics server");

    *lock = Some(handle.clone());

    Ok(handle)
}
