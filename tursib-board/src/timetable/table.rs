//! Parsed timetable containers.

use crate::domain::{ProgramKey, RawDeparture};

/// Departures grouped by weekly program, each in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramTable {
    weekday: Vec<RawDeparture>,
    saturday: Vec<RawDeparture>,
    sunday: Vec<RawDeparture>,
}

impl ProgramTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Departures for one program, in the order they appeared on the page.
    pub fn get(&self, key: ProgramKey) -> &[RawDeparture] {
        match key {
            ProgramKey::Weekday => &self.weekday,
            ProgramKey::Saturday => &self.saturday,
            ProgramKey::Sunday => &self.sunday,
        }
    }

    pub fn push(&mut self, key: ProgramKey, departure: RawDeparture) {
        self.slot(key).push(departure);
    }

    /// True when no program has any departures.
    pub fn is_empty(&self) -> bool {
        ProgramKey::ALL.iter().all(|&k| self.get(k).is_empty())
    }

    /// Total number of departures across all programs.
    pub fn len(&self) -> usize {
        ProgramKey::ALL.iter().map(|&k| self.get(k).len()).sum()
    }

    fn slot(&mut self, key: ProgramKey) -> &mut Vec<RawDeparture> {
        match key {
            ProgramKey::Weekday => &mut self.weekday,
            ProgramKey::Saturday => &mut self.saturday,
            ProgramKey::Sunday => &mut self.sunday,
        }
    }
}

/// Result of parsing a timetable page.
///
/// `NoData` is an expected state (the page rendered but carried no
/// timetable), not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Found(ProgramTable),
    NoData,
}

impl ParseOutcome {
    /// Wrap a table, mapping an empty one to `NoData`.
    pub fn from_table(table: ProgramTable) -> Self {
        if table.is_empty() {
            ParseOutcome::NoData
        } else {
            ParseOutcome::Found(table)
        }
    }

    pub fn table(&self) -> Option<&ProgramTable> {
        match self {
            ParseOutcome::Found(table) => Some(table),
            ParseOutcome::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, ParseOutcome::NoData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ClockTime;

    fn dep(line: &str, time: &str) -> RawDeparture {
        RawDeparture::new(line, "Gara", ClockTime::parse_hhmm(time).unwrap())
    }

    #[test]
    fn empty_table_is_no_data() {
        let outcome = ParseOutcome::from_table(ProgramTable::new());
        assert!(outcome.is_no_data());
        assert!(outcome.table().is_none());
    }

    #[test]
    fn any_program_makes_it_found() {
        let mut table = ProgramTable::new();
        table.push(ProgramKey::Sunday, dep("5", "10:00"));

        assert!(!table.is_empty());
        assert_eq!(table.len(), 1);
        assert!(table.get(ProgramKey::Weekday).is_empty());

        let outcome = ParseOutcome::from_table(table);
        assert_eq!(outcome.table().unwrap().get(ProgramKey::Sunday).len(), 1);
    }

    #[test]
    fn push_preserves_insertion_order() {
        let mut table = ProgramTable::new();
        table.push(ProgramKey::Weekday, dep("1", "12:00"));
        table.push(ProgramKey::Weekday, dep("2", "06:00"));

        let lines: Vec<_> = table
            .get(ProgramKey::Weekday)
            .iter()
            .map(|d| d.line.as_str())
            .collect();
        assert_eq!(lines, vec!["1", "2"]);
    }
}
