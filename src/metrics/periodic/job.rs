use super::MetricCollector;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::warn;

/// A collector run on a fixed interval.
pub struct PeriodicJob<T> {
    collector: T,
    interval: Interval,
}

impl<T: MetricCollector + Send + 'static> PeriodicJob<T> {
    /// Spawns a task running `collector` on every tick of `interval`.
    ///
    /// Collection failures are logged and retried on the next tick.
    pub fn launch_task(collector: T, mut interval: Interval) {
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut job = Self { collector, interval };

        tokio::spawn(async move {
            loop {
                job.interval.tick().await;
                if let Err(err) = job.collector.collect().await {
                    warn!(target: "relay::metrics", %err, collector = ?job.collector, "Failed to collect metrics");
                }
            }
        });
    }
}
