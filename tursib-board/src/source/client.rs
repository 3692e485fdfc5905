//! Timetable page HTTP client.

use std::time::Duration;

use tracing::debug;

use crate::domain::StationId;

use super::PageSource;
use super::error::FetchError;

/// Default host serving the station pages.
pub const DEFAULT_BASE_URL: &str = "https://tursib.ro";

/// Default request timeout. A hung server must not stall a refresh cycle.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Maximum number of body characters kept in a status error.
const ERROR_BODY_CHARS: usize = 200;

/// Configuration for the timetable client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the site, without trailing slash
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP client fetching station timetable pages.
#[derive(Debug, Clone)]
pub struct TimetableClient {
    http: reqwest::Client,
    base_url: String,
}

impl TimetableClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// URL of a station's page with arrivals shown.
    pub fn station_url(&self, station: &StationId) -> String {
        format!("{}/s/{}?arrivals=on", self.base_url, station.as_str())
    }

    /// Fetch the raw page markup for a station.
    pub async fn fetch_page(&self, station: &StationId) -> Result<String, FetchError> {
        let url = self.station_url(station);
        debug!(%station, %url, "fetching timetable page");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_CHARS).collect(),
            });
        }

        Ok(response.text().await?)
    }
}

impl PageSource for TimetableClient {
    async fn fetch(&self, station: &StationId) -> Result<String, FetchError> {
        self.fetch_page(station).await
    }
}
