//! One refresh cycle for one station: fetch, parse, project.

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::domain::{Station, StationId, select_program_key};
use crate::projector::project;
use crate::source::{FetchError, PageSource};
use crate::timetable::{self, ParseOutcome};

use super::snapshot::BoardSnapshot;

/// Why a refresh cycle failed. Every variant names the station.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    /// The page could not be fetched
    #[error("error updating station {station}: {source}")]
    Fetch {
        station: StationId,
        source: FetchError,
    },

    /// The refresh task panicked or was cancelled
    #[error("refresh of station {station} aborted: {message}")]
    Aborted { station: StationId, message: String },
}

impl RefreshError {
    pub fn station(&self) -> &StationId {
        match self {
            RefreshError::Fetch { station, .. } | RefreshError::Aborted { station, .. } => station,
        }
    }
}

/// Build a board from page markup, relative to `now`.
///
/// A page without timetable data gives an empty board labelled `Unknown`
/// rather than an error.
pub fn build_snapshot(station_name: &str, html: &str, now: NaiveDateTime) -> BoardSnapshot {
    let table = match timetable::parse(html) {
        ParseOutcome::Found(table) => table,
        ParseOutcome::NoData => {
            warn!(station = %station_name, "no timetable data found");
            return BoardSnapshot::no_data(station_name, now);
        }
    };

    let key = select_program_key(now);
    let departures = project(table.get(key), now, true);

    BoardSnapshot {
        station: station_name.to_string(),
        program: key.label(),
        departures,
        last_update: now,
    }
}

/// Run one refresh cycle for a station.
///
/// This is a single best-effort attempt; retrying is up to the caller.
pub async fn refresh_station<S: PageSource>(
    source: &S,
    station: &Station,
    now: NaiveDateTime,
) -> Result<BoardSnapshot, RefreshError> {
    let html = source
        .fetch(&station.id)
        .await
        .map_err(|source| RefreshError::Fetch {
            station: station.id.clone(),
            source,
        })?;

    let snapshot = build_snapshot(&station.name, &html, now);
    debug!(
        station = %station.id,
        program = %snapshot.program,
        departures = snapshot.departures.len(),
        "refreshed board"
    );

    Ok(snapshot)
}
