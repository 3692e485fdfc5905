//! Page fetch error types.

use crate::domain::StationId;

/// Errors that can occur while fetching a timetable page.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport failure: connection refused, timeout, bad TLS, etc.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// No page available for the station (mock source)
    #[error("no timetable page for station {0}")]
    NotFound(StationId),

    /// Reading a local page failed (mock source)
    #[error("I/O error: {message}")]
    Io { message: String },
}
