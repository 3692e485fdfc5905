//! Per-station board state, owned by the refresh harness.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use tokio::sync::RwLock;

use crate::domain::{Station, StationId};

use super::refresh::RefreshError;
use super::snapshot::BoardSnapshot;

/// Last known state of one station's board.
#[derive(Debug, Clone)]
pub struct StationStatus {
    pub station: Station,
    /// Last successful snapshot; kept across failed cycles.
    pub snapshot: Option<BoardSnapshot>,
    /// Message of the most recent failure, cleared on success.
    pub last_error: Option<String>,
    pub consecutive_failures: u32,
    pub last_success: Option<NaiveDateTime>,
}

impl StationStatus {
    fn new(station: Station) -> Self {
        Self {
            station,
            snapshot: None,
            last_error: None,
            consecutive_failures: 0,
            last_success: None,
        }
    }

    /// Whether a board can be shown for this station.
    pub fn is_available(&self) -> bool {
        self.snapshot.is_some()
    }
}

/// Thread-safe map of station boards.
///
/// Built once at startup from the configured stations; refresh results are
/// recorded into it and readers get clones of the current state.
#[derive(Clone, Default)]
pub struct BoardRegistry {
    inner: Arc<RwLock<BTreeMap<StationId, StationStatus>>>,
}

impl BoardRegistry {
    pub fn new(stations: impl IntoIterator<Item = Station>) -> Self {
        let map = stations
            .into_iter()
            .map(|s| (s.id.clone(), StationStatus::new(s)))
            .collect();

        Self {
            inner: Arc::new(RwLock::new(map)),
        }
    }

    /// All configured stations, ordered by id.
    pub async fn stations(&self) -> Vec<Station> {
        let guard = self.inner.read().await;
        guard.values().map(|s| s.station.clone()).collect()
    }

    /// Current state of one station.
    pub async fn get(&self, id: &StationId) -> Option<StationStatus> {
        let guard = self.inner.read().await;
        guard.get(id).cloned()
    }

    /// Current state of every station, ordered by id.
    pub async fn list(&self) -> Vec<StationStatus> {
        let guard = self.inner.read().await;
        guard.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Record the outcome of a refresh cycle.
    ///
    /// On success the snapshot replaces the previous one. On failure the
    /// previous snapshot is kept and the error is remembered. Results for
    /// stations that are not registered are ignored.
    pub async fn record(&self, id: &StationId, result: &Result<BoardSnapshot, RefreshError>) {
        let mut guard = self.inner.write().await;
        let Some(status) = guard.get_mut(id) else {
            return;
        };

        match result {
            Ok(snapshot) => {
                status.last_success = Some(snapshot.last_update);
                status.snapshot = Some(snapshot.clone());
                status.last_error = None;
                status.consecutive_failures = 0;
            }
            Err(e) => {
                status.last_error = Some(e.to_string());
                status.consecutive_failures = status.consecutive_failures.saturating_add(1);
            }
        }
    }
}
