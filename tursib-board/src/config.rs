//! Service configuration.
//!
//! Read from environment variables:
//!
//! | variable | default |
//! |---|---|
//! | `TURSIB_STATIONS` | required, `id=Name;id=Name` |
//! | `TURSIB_BASE_URL` | `https://tursib.ro` |
//! | `TURSIB_REFRESH_SECS` | `60` |
//! | `TURSIB_TIMEOUT_SECS` | `15` |
//! | `TURSIB_LISTEN_ADDR` | `127.0.0.1:3000` |
//! | `TURSIB_MOCK_DIR` | unset; when set, pages are served from this directory |

use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::{InvalidStationId, Station, StationId};
use crate::source::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Default refresh interval (one minute).
const DEFAULT_REFRESH_SECS: u64 = 60;

/// Default HTTP listen address.
const DEFAULT_LISTEN_ADDR: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
    3000,
);

/// Errors in the service configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("{0} is not set")]
    Missing(&'static str),

    /// A variable could not be parsed
    #[error("invalid {var}: {message}")]
    Invalid { var: &'static str, message: String },

    /// A station entry is malformed
    #[error("invalid station entry {entry:?}: {message}")]
    Station { entry: String, message: String },

    /// The same station id appears twice
    #[error("station {0} is configured more than once")]
    DuplicateStation(StationId),

    /// No stations configured
    #[error("no stations configured")]
    NoStations,
}

/// Configuration for the departure board service.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Stations to poll
    pub stations: Vec<Station>,
    /// Base URL of the timetable site
    pub base_url: String,
    /// Time between refresh cycles
    pub refresh_interval: Duration,
    /// Page fetch timeout in seconds
    pub timeout_secs: u64,
    /// Address for the HTTP API
    pub listen_addr: SocketAddr,
    /// Serve saved pages from this directory instead of the live site
    pub mock_dir: Option<PathBuf>,
}

impl BoardConfig {
    /// Create a config for the given stations with default settings.
    pub fn new(stations: Vec<Station>) -> Self {
        Self {
            stations,
            base_url: DEFAULT_BASE_URL.to_string(),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            listen_addr: DEFAULT_LISTEN_ADDR,
            mock_dir: None,
        }
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through a variable lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let stations = lookup("TURSIB_STATIONS").ok_or(ConfigError::Missing("TURSIB_STATIONS"))?;
        let mut config = Self::new(parse_stations(&stations)?);

        if let Some(url) = lookup("TURSIB_BASE_URL") {
            config = config.with_base_url(url);
        }

        if let Some(secs) = lookup("TURSIB_REFRESH_SECS") {
            let secs = parse_positive_secs("TURSIB_REFRESH_SECS", &secs)?;
            config = config.with_refresh_interval(Duration::from_secs(secs));
        }

        if let Some(secs) = lookup("TURSIB_TIMEOUT_SECS") {
            config = config.with_timeout(parse_positive_secs("TURSIB_TIMEOUT_SECS", &secs)?);
        }

        if let Some(addr) = lookup("TURSIB_LISTEN_ADDR") {
            let addr = addr.trim().parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::Invalid {
                    var: "TURSIB_LISTEN_ADDR",
                    message: e.to_string(),
                }
            })?;
            config = config.with_listen_addr(addr);
        }

        if let Some(dir) = lookup("TURSIB_MOCK_DIR").filter(|d| !d.trim().is_empty()) {
            config = config.with_mock_dir(dir.trim());
        }

        Ok(config)
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the refresh interval.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Set the fetch timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the HTTP listen address.
    pub fn with_listen_addr(mut self, addr: SocketAddr) -> Self {
        self.listen_addr = addr;
        self
    }

    /// Serve pages from a directory instead of the live site.
    pub fn with_mock_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.mock_dir = Some(dir.into());
        self
    }

    /// Page client settings derived from this config.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new()
            .with_base_url(&self.base_url)
            .with_timeout(self.timeout_secs)
    }
}

/// Parse a station list of the form `id=Name;id=Name`.
///
/// Blank entries are skipped. Ids must be valid [`StationId`]s and unique;
/// names are trimmed and must not be empty.
pub fn parse_stations(s: &str) -> Result<Vec<Station>, ConfigError> {
    let mut seen = HashSet::new();
    let mut stations = Vec::new();

    for entry in s.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        let (id, name) = entry.split_once('=').ok_or_else(|| ConfigError::Station {
            entry: entry.to_string(),
            message: "expected id=Name".to_string(),
        })?;

        let id = StationId::parse(id.trim()).map_err(|e: InvalidStationId| {
            ConfigError::Station {
                entry: entry.to_string(),
                message: e.to_string(),
            }
        })?;

        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::Station {
                entry: entry.to_string(),
                message: "station name is empty".to_string(),
            });
        }

        if !seen.insert(id.clone()) {
            return Err(ConfigError::DuplicateStation(id));
        }

        stations.push(Station::new(id, name));
    }

    if stations.is_empty() {
        return Err(ConfigError::NoStations);
    }

    Ok(stations)
}

fn parse_positive_secs(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            var,
            message: "must be greater than zero".to_string(),
        }),
        Ok(secs) => Ok(secs),
        Err(e) => Err(ConfigError::Invalid {
            var,
            message: e.to_string(),
        }),
    }
}
