//! Departure records, as read from the page and as projected onto a board.

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::fmt;

use super::ClockTime;

/// Placeholder used when the page does not say which line or destination.
pub const UNKNOWN_FIELD: &str = "?";

/// One scheduled departure as advertised on the timetable page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RawDeparture {
    /// Route identifier, e.g. "11".
    pub line: String,
    /// Direction or final stop.
    pub destination: String,
    /// Time of day the service leaves the station.
    pub departure_time: ClockTime,
}

impl RawDeparture {
    pub fn new(
        line: impl Into<String>,
        destination: impl Into<String>,
        departure_time: ClockTime,
    ) -> Self {
        Self {
            line: line.into(),
            destination: destination.into(),
            departure_time,
        }
    }
}

/// How long until a departure, as shown on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinutesLabel {
    /// Less than a minute away.
    Now,
    /// Whole minutes remaining, rounded up. Always at least 1.
    Minutes(u32),
}

impl fmt::Display for MinutesLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinutesLabel::Now => f.write_str("now"),
            MinutesLabel::Minutes(n) => write!(f, "{n}"),
        }
    }
}

impl Serialize for MinutesLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A departure anchored to a concrete date and time relative to some "now".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedDeparture {
    pub line: String,
    pub destination: String,
    pub departure_time: ClockTime,
    /// Next occurrence; strictly after the instant it was projected from.
    pub occurrence: NaiveDateTime,
    pub minutes: MinutesLabel,
}

impl ProjectedDeparture {
    pub fn from_raw(raw: &RawDeparture, occurrence: NaiveDateTime, minutes: MinutesLabel) -> Self {
        Self {
            line: raw.line.clone(),
            destination: raw.destination.clone(),
            departure_time: raw.departure_time,
            occurrence,
            minutes,
        }
    }
}
