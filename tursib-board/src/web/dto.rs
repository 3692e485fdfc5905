//! Data transfer objects for web responses.

use serde::Serialize;

use crate::board::{BoardSnapshot, NO_DEPARTURE, StationStatus};
use crate::domain::{ProgramLabel, StationId};

/// One station in the board listing.
#[derive(Debug, Serialize)]
pub struct BoardSummary {
    /// Station identifier
    pub station_id: StationId,

    /// Station name
    pub station: String,

    /// Next departure time, or "n/a"
    pub state: String,

    /// Program of the last snapshot, if any
    pub program: Option<ProgramLabel>,

    /// Whether a snapshot is available
    pub available: bool,

    /// Failed cycles since the last success
    pub consecutive_failures: u32,

    /// Most recent failure message
    pub last_error: Option<String>,
}

impl BoardSummary {
    pub fn from_status(status: &StationStatus) -> Self {
        Self {
            station_id: status.station.id.clone(),
            station: status.station.name.clone(),
            state: status
                .snapshot
                .as_ref()
                .map(BoardSnapshot::current_value)
                .unwrap_or_else(|| NO_DEPARTURE.to_string()),
            program: status.snapshot.as_ref().map(|s| s.program),
            available: status.is_available(),
            consecutive_failures: status.consecutive_failures,
            last_error: status.last_error.clone(),
        }
    }
}

/// Response listing all boards.
#[derive(Debug, Serialize)]
pub struct BoardListResponse {
    pub boards: Vec<BoardSummary>,
}

/// A single board in sensor shape: headline state plus full attributes.
#[derive(Debug, Serialize)]
pub struct SensorResponse {
    /// Next departure time, or "n/a"
    pub state: String,

    /// The full snapshot
    pub attributes: BoardSnapshot,
}

impl SensorResponse {
    pub fn from_snapshot(snapshot: BoardSnapshot) -> Self {
        Self {
            state: snapshot.current_value(),
            attributes: snapshot,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
