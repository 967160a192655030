//! Periodic expiry sweep.
//!
//! Expiry is already enforced on every read. The sweep reclaims memory,
//! persists entities whose boosts ran out and sends the expiry notices.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::service::EconomyService;

pub struct ExpirySweeper {
    service: Arc<EconomyService>,
    interval: Duration,
    shutdown: watch::Receiver<bool>,
}

impl ExpirySweeper {
    pub fn new(
        service: Arc<EconomyService>,
        interval: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            service,
            interval: interval.max(Duration::from_millis(1)),
            shutdown,
        }
    }

    /// Main worker loop
    pub async fn run(mut self) {
        info!("ExpirySweeper started: interval={:?}", self.interval);

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let report = self.service.sweep(self.service.now());
                    if !report.is_empty() {
                        debug!("Sweep removed {} expired boost(s)", report.removed());
                    }
                }
                _ = self.shutdown.changed() => break,
            }
        }

        info!("ExpirySweeper stopped");
    }
}
