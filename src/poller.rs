//! Periodic poll loop.
//!
//! Every tick refreshes each catalog reading in turn and hands the result to the sink.
//! A failing reading only affects its own slot.

use crate::catalog::ReadingSpec;
use crate::client::RegisterSource;
use crate::sensor;
use crate::sink::ReadingSink;
use crate::state::StateStore;
use std::future::Future;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub available: usize,
    pub unavailable: usize,
}

pub struct Poller<S, K> {
    source: S,
    sink: K,
    catalog: &'static [ReadingSpec],
    state: StateStore,
    interval: Duration,
}

impl<S, K> Poller<S, K>
where
    S: RegisterSource,
    K: ReadingSink,
{
    pub fn new(source: S, sink: K, catalog: &'static [ReadingSpec], interval: Duration) -> Self {
        Self {
            source,
            sink,
            catalog,
            state: StateStore::new(catalog),
            interval,
        }
    }

    pub fn state(&self) -> &StateStore {
        &self.state
    }

    /// Refresh every reading once.
    pub async fn poll_once(&mut self) -> PollSummary {
        let mut summary = PollSummary::default();

        for spec in self.catalog {
            let reading = sensor::update(spec, &self.source, &mut self.state).await;
            if reading.is_available() {
                summary.available += 1;
            } else {
                summary.unavailable += 1;
            }

            if let Err(e) = self.sink.publish(spec, &reading).await {
                warn!(key = %spec.key, error = %e, "failed to publish reading");
            }
        }

        if summary.unavailable > 0 {
            info!(
                available = summary.available,
                unavailable = summary.unavailable,
                "poll cycle finished with unavailable readings"
            );
        } else {
            debug!(available = summary.available, "poll cycle finished");
        }
        summary
    }

    /// Announce the sensors, then poll on every tick until `shutdown` resolves.
    pub async fn run<F>(mut self, shutdown: F) -> StateStore
    where
        F: Future<Output = ()>,
    {
        if let Err(e) = self.sink.announce(self.catalog).await {
            warn!(error = %e, "failed to announce sensors");
        }

        info!(
            interval_secs = self.interval.as_secs(),
            readings = self.catalog.len(),
            "poller started"
        );

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("shutdown requested");
                    break;
                }
                _ = ticker.tick() => {}
            }

            // A cycle can span several device timeouts; shutdown still wins.
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("shutdown requested, abandoning poll cycle");
                    break;
                }
                _ = self.poll_once() => {}
            }
        }

        self.state
    }
}
