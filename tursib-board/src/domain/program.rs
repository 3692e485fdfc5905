//! Weekly timetable programs.
//!
//! The page publishes one program for Monday to Friday, one for Saturday
//! and one for Sunday. Holidays are not modelled.

use chrono::{Datelike, NaiveDateTime, Weekday};
use serde::Serialize;
use std::fmt;

/// Which weekly program a set of departures belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramKey {
    Weekday,
    Saturday,
    Sunday,
}

impl ProgramKey {
    /// All program keys, in timetable order.
    pub const ALL: [ProgramKey; 3] = [ProgramKey::Weekday, ProgramKey::Saturday, ProgramKey::Sunday];

    /// The program that applies on the date of `now`.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use tursib_board::domain::ProgramKey;
    ///
    /// // 2024-03-16 was a Saturday
    /// let now = NaiveDate::from_ymd_opt(2024, 3, 16).unwrap().and_hms_opt(12, 0, 0).unwrap();
    /// assert_eq!(ProgramKey::for_instant(now), ProgramKey::Saturday);
    /// ```
    pub fn for_instant(now: NaiveDateTime) -> Self {
        Self::for_weekday(now.weekday())
    }

    /// The program that applies on the given day of the week.
    pub fn for_weekday(day: Weekday) -> Self {
        match day {
            Weekday::Sat => ProgramKey::Saturday,
            Weekday::Sun => ProgramKey::Sunday,
            Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu | Weekday::Fri => {
                ProgramKey::Weekday
            }
        }
    }

    /// Classify a section heading from the timetable page.
    ///
    /// Matching is case-insensitive and by substring, checked in the order
    /// weekday, Saturday, Sunday. Headings that match nothing return `None`.
    pub fn classify_heading(heading: &str) -> Option<Self> {
        let heading = heading.to_lowercase();
        let has = |markers: &[&str]| markers.iter().any(|m| heading.contains(m));

        if has(&["luni", "monday"]) {
            Some(ProgramKey::Weekday)
        } else if has(&["sâmbătă", "sambata", "saturday"]) {
            Some(ProgramKey::Saturday)
        } else if has(&["duminică", "duminica", "sunday"]) {
            Some(ProgramKey::Sunday)
        } else {
            None
        }
    }

    /// The display label for this program.
    pub fn label(self) -> ProgramLabel {
        match self {
            ProgramKey::Weekday => ProgramLabel::Weekday,
            ProgramKey::Saturday => ProgramLabel::Saturday,
            ProgramKey::Sunday => ProgramLabel::Sunday,
        }
    }
}

/// Select the program for `now`.
pub fn select_program_key(now: NaiveDateTime) -> ProgramKey {
    ProgramKey::for_instant(now)
}

/// Program label shown alongside a board.
///
/// `Unknown` is used when the page had no timetable data at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProgramLabel {
    Weekday,
    Saturday,
    Sunday,
    Unknown,
}

impl fmt::Display for ProgramLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProgramLabel::Weekday => "Weekday",
            ProgramLabel::Saturday => "Saturday",
            ProgramLabel::Sunday => "Sunday",
            ProgramLabel::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}
