//! Tursib station departure boards.
//!
//! Scrapes a station's timetable page and answers: "what leaves here next?"
//! The page lists every departure of the day by weekly program; this crate
//! picks today's program, anchors each time to a date relative to now, and
//! keeps the next few.

pub mod board;
pub mod config;
pub mod domain;
pub mod projector;
pub mod source;
pub mod timetable;
pub mod web;
