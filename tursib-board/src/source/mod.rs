//! Timetable page sources.
//!
//! The refresh cycle only needs "give me the markup for this station". The
//! live site is reached through [`TimetableClient`]; [`MockPageSource`]
//! serves saved pages for development and tests.

mod client;
mod error;
mod mock;

use std::future::Future;

use crate::domain::StationId;

pub use client::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, TimetableClient};
pub use error::FetchError;
pub use mock::MockPageSource;

/// Something that can supply a station's timetable page.
///
/// This abstraction allows the refresh cycle to be tested with saved pages.
pub trait PageSource: Send + Sync {
    /// Fetch the raw page markup for a station.
    fn fetch(
        &self,
        station: &StationId,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}
