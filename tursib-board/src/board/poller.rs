//! Periodic refresh of every registered station.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use futures::future::join_all;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::source::PageSource;

use super::refresh::{RefreshError, refresh_station};
use super::registry::BoardRegistry;

/// Outcome counts of one pass over all stations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Refreshes every station in a registry on a fixed interval.
pub struct Poller<S> {
    source: Arc<S>,
    registry: BoardRegistry,
    interval: Duration,
}

impl<S: PageSource + 'static> Poller<S> {
    pub fn new(source: S, registry: BoardRegistry, interval: Duration) -> Self {
        Self {
            source: Arc::new(source),
            registry,
            interval,
        }
    }

    pub fn registry(&self) -> &BoardRegistry {
        &self.registry
    }

    /// Refresh all stations once, relative to `now`.
    ///
    /// Stations run concurrently in their own tasks, so a panic while
    /// handling one page is reported as that station's failure only.
    pub async fn refresh_all(&self, now: NaiveDateTime) -> RefreshSummary {
        let stations = self.registry.stations().await;

        let tasks = stations.iter().map(|station| {
            let source = Arc::clone(&self.source);
            let station = station.clone();
            tokio::spawn(async move { refresh_station(source.as_ref(), &station, now).await })
        });
        let results = join_all(tasks).await;

        let mut summary = RefreshSummary::default();
        for (station, joined) in stations.iter().zip(results) {
            let result = joined.unwrap_or_else(|e| {
                Err(RefreshError::Aborted {
                    station: station.id.clone(),
                    message: e.to_string(),
                })
            });

            match &result {
                Ok(_) => summary.succeeded += 1,
                Err(e) => {
                    warn!(station = %station.id, error = %e, "refresh failed");
                    summary.failed += 1;
                }
            }

            self.registry.record(&station.id, &result).await;
        }

        summary
    }

    /// Refresh immediately, then on every interval tick. Never returns.
    pub async fn run(self) {
        let summary = self.refresh_all(Local::now().naive_local()).await;
        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "initial refresh complete"
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await; // First tick is immediate, skip it

        loop {
            interval.tick().await;
            self.refresh_all(Local::now().naive_local()).await;
        }
    }
}
