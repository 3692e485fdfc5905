//! Station boards and the harness that keeps them fresh.
//!
//! [`refresh_station`] is one fetch-parse-project cycle and is all a host
//! needs to drive the boards itself. [`Poller`] is the built-in driver: it
//! runs the cycle for every station on an interval and stores the last good
//! snapshot of each in a [`BoardRegistry`].

mod poller;
mod refresh;
mod registry;
mod snapshot;

pub use poller::{Poller, RefreshSummary};
pub use refresh::{RefreshError, build_snapshot, refresh_station};
pub use registry::{BoardRegistry, StationStatus};
pub use snapshot::{BoardSnapshot, NO_DEPARTURE};
