//! Next-departure projection.
//!
//! Timetable entries are bare times of day. Given a reference instant, each
//! entry is anchored to today, or to tomorrow when rollover is allowed and
//! today's run has already left. The board then shows the earliest
//! [`MAX_DEPARTURES`] of them.

use std::collections::HashSet;

use chrono::{Duration, NaiveDateTime};

use crate::domain::{ClockTime, MinutesLabel, ProjectedDeparture, RawDeparture};

/// Maximum number of departures on a board.
pub const MAX_DEPARTURES: usize = 10;

/// Below this many seconds a departure is shown as "now".
const NOW_THRESHOLD_SECS: i64 = 60;

/// One time of day anchored relative to a reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    /// Next occurrence, strictly after the reference instant.
    pub occurrence: NaiveDateTime,
    /// Time between the reference instant and `occurrence`.
    pub remaining: Duration,
    pub minutes: MinutesLabel,
}

impl Projection {
    /// Whole seconds remaining, rounded down.
    pub fn remaining_seconds(&self) -> i64 {
        self.remaining.num_seconds()
    }
}

/// Project an "HH:MM" string relative to `now`.
///
/// Returns `None` when the string is not a valid time, or when today's
/// occurrence is at or before `now` and `allow_next_day` is false.
///
/// ```
/// use chrono::NaiveDate;
/// use tursib_board::domain::MinutesLabel;
/// use tursib_board::projector::project_one;
///
/// let now = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(7, 59, 0).unwrap();
/// let p = project_one(now, "08:00", false).unwrap();
/// assert_eq!(p.remaining_seconds(), 60);
/// assert_eq!(p.minutes, MinutesLabel::Minutes(1));
/// ```
pub fn project_one(now: NaiveDateTime, hhmm: &str, allow_next_day: bool) -> Option<Projection> {
    let time = ClockTime::parse_hhmm(hhmm).ok()?;
    project_time(now, time, allow_next_day)
}

/// Project an already validated time of day relative to `now`.
pub fn project_time(
    now: NaiveDateTime,
    time: ClockTime,
    allow_next_day: bool,
) -> Option<Projection> {
    let mut occurrence = time.on(now.date());

    // Equal to now counts as already departed
    if occurrence <= now {
        if !allow_next_day {
            return None;
        }
        occurrence = occurrence.date().succ_opt()?.and_time(time.time());
    }

    let remaining = occurrence.signed_duration_since(now);
    if remaining <= Duration::zero() {
        return None;
    }

    Some(Projection {
        occurrence,
        remaining,
        minutes: minutes_label(remaining),
    })
}

/// Board label for a positive remaining duration.
fn minutes_label(remaining: Duration) -> MinutesLabel {
    if remaining < Duration::seconds(NOW_THRESHOLD_SECS) {
        return MinutesLabel::Now;
    }

    // Ceiling on milliseconds so a partial minute counts as a whole one
    let millis = remaining.num_milliseconds();
    let minutes = (millis + 59_999) / 60_000;
    MinutesLabel::Minutes(u32::try_from(minutes).unwrap_or(u32::MAX))
}

/// Project a program's departures relative to `now`.
///
/// Only departures still to come today are considered first. If none are
/// left and `allow_next_day_fallback` is set, the whole program is projected
/// onto tomorrow instead, so a board never mixes tonight's and tomorrow's
/// runs. The result is deduplicated on (line, time, occurrence), sorted by
/// occurrence with ties in input order, and capped at [`MAX_DEPARTURES`].
pub fn project(
    records: &[RawDeparture],
    now: NaiveDateTime,
    allow_next_day_fallback: bool,
) -> Vec<ProjectedDeparture> {
    let mut departures = project_pass(records, now, false);

    if departures.is_empty() && allow_next_day_fallback {
        departures = project_pass(records, now, true);
    }

    departures.sort_by_key(|d| d.occurrence);
    departures.truncate(MAX_DEPARTURES);
    departures
}

/// One projection pass, deduplicated but unsorted.
fn project_pass(
    records: &[RawDeparture],
    now: NaiveDateTime,
    allow_next_day: bool,
) -> Vec<ProjectedDeparture> {
    let mut seen = HashSet::new();

    records
        .iter()
        .filter_map(|raw| {
            let projection = project_time(now, raw.departure_time, allow_next_day)?;
            let key = (raw.line.as_str(), raw.departure_time, projection.occurrence);
            seen.insert(key).then(|| {
                ProjectedDeparture::from_raw(raw, projection.occurrence, projection.minutes)
            })
        })
        .collect()
}
