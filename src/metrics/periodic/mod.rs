mod balance;
use balance::BalanceCollector;

mod job;
use job::PeriodicJob;

use crate::{chain::Chain, error::ChainError};
use alloy::primitives::{Address, ChainId};
use std::{fmt::Debug, future::Future, time::Duration};

/// Trait for a collector that records its own metric.
pub trait MetricCollector: Debug {
    /// Collects metrics and records them.
    fn collect(&self) -> impl Future<Output = Result<(), ChainError>> + Send;
}

/// Spawns all available periodic metric collectors.
pub fn spawn_periodic_collectors(relayer: Address, chain: Chain, chain_id: ChainId) {
    PeriodicJob::launch_task(
        BalanceCollector::new(relayer, chain, chain_id),
        tokio::time::interval(Duration::from_secs(30)),
    );
}
