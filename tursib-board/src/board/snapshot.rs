//! Board snapshots handed to the presentation layer.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::{ProgramLabel, ProjectedDeparture};

/// Value shown when a board has no upcoming departures.
pub const NO_DEPARTURE: &str = "n/a";

/// The result of one successful refresh of a station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardSnapshot {
    /// Station name as configured.
    pub station: String,
    /// Program the departures were taken from.
    pub program: ProgramLabel,
    /// Upcoming departures, earliest first.
    pub departures: Vec<ProjectedDeparture>,
    /// Reference instant the departures were projected from.
    pub last_update: NaiveDateTime,
}

impl BoardSnapshot {
    /// An empty board for a page that carried no timetable.
    pub fn no_data(station: impl Into<String>, now: NaiveDateTime) -> Self {
        Self {
            station: station.into(),
            program: ProgramLabel::Unknown,
            departures: Vec::new(),
            last_update: now,
        }
    }

    /// The headline value: next departure time, or [`NO_DEPARTURE`].
    pub fn current_value(&self) -> String {
        self.departures
            .first()
            .map(|d| d.departure_time.to_string())
            .unwrap_or_else(|| NO_DEPARTURE.to_string())
    }
}
