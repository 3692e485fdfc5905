//! Domain types for the departure board.
//!
//! Everything here is validated at construction time: a `ClockTime` is a
//! real time of day and a `StationId` is safe to put in a URL, so code that
//! receives these types can trust them.

mod departure;
mod program;
mod station;
mod time;

pub use departure::{MinutesLabel, ProjectedDeparture, RawDeparture, UNKNOWN_FIELD};
pub use program::{ProgramKey, ProgramLabel, select_program_key};
pub use station::{InvalidStationId, Station, StationId};
pub use time::{ClockTime, TimeError};
