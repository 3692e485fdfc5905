//! Station identifier types.

use serde::Serialize;
use std::fmt;

/// Maximum length of a station identifier.
const MAX_ID_LEN: usize = 32;

/// Error returned when parsing an invalid station identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station id: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// A station identifier as used in timetable page URLs (`/s/<id>`).
///
/// Identifiers are 1-32 ASCII alphanumerics, `-` or `_`, so they can be
/// placed in a URL path or a file name without escaping.
///
/// # Examples
///
/// ```
/// use tursib_board::domain::StationId;
///
/// let id = StationId::parse("123").unwrap();
/// assert_eq!(id.as_str(), "123");
///
/// assert!(StationId::parse("").is_err());
/// assert!(StationId::parse("../etc").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    /// Parse a station identifier from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        if s.is_empty() {
            return Err(InvalidStationId {
                reason: "must not be empty",
            });
        }

        if s.len() > MAX_ID_LEN {
            return Err(InvalidStationId {
                reason: "must be at most 32 characters",
            });
        }

        if !s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(InvalidStationId {
                reason: "must be ASCII letters, digits, '-' or '_'",
            });
        }

        Ok(Self(s.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A configured station: the page identifier and the name shown to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub id: StationId,
    pub name: String,
}

impl Station {
    pub fn new(id: StationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
