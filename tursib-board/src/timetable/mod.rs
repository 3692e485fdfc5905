//! Timetable page parsing.
//!
//! Turns the station page markup into departures grouped by weekly
//! program. Parsing is pure and never fails: markup that does not look like
//! a timetable yields [`ParseOutcome::NoData`].

mod parser;
mod table;

pub use parser::parse;
pub use table::{ParseOutcome, ProgramTable};
