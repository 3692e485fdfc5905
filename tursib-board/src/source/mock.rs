//! Mock page source for running without network access.
//!
//! Serves saved timetable pages from a directory as if they were fetched
//! from the live site.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::StationId;

use super::PageSource;
use super::error::FetchError;

/// Page source backed by saved HTML files.
///
/// Cloning shares the underlying pages, so a test can change a page after
/// handing the source to a poller.
#[derive(Debug, Clone, Default)]
pub struct MockPageSource {
    pages: Arc<RwLock<HashMap<StationId, String>>>,
}

impl MockPageSource {
    /// Load every `{station_id}.html` file in a directory.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, FetchError> {
        let data_dir = data_dir.as_ref();
        let mut pages = HashMap::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| FetchError::Io {
            message: format!("failed to read mock page directory {:?}: {}", data_dir, e),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| FetchError::Io {
                message: format!("failed to read directory entry: {}", e),
            })?;

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("html") {
                continue;
            }

            // "123.html" -> "123"
            let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| StationId::parse(s).ok())
            else {
                continue;
            };

            let html = std::fs::read_to_string(&path).map_err(|e| FetchError::Io {
                message: format!("failed to read {:?}: {}", path, e),
            })?;

            pages.insert(id, html);
        }

        if pages.is_empty() {
            return Err(FetchError::Io {
                message: format!("no mock pages found in {:?}", data_dir),
            });
        }

        Ok(Self {
            pages: Arc::new(RwLock::new(pages)),
        })
    }

    /// Build a source from in-memory pages.
    pub fn from_pages(pages: impl IntoIterator<Item = (StationId, String)>) -> Self {
        Self {
            pages: Arc::new(RwLock::new(pages.into_iter().collect())),
        }
    }

    /// Replace or add a station's page.
    pub async fn set_page(&self, station: StationId, html: impl Into<String>) {
        self.pages.write().await.insert(station, html.into());
    }

    /// Remove a station's page, so fetching it fails.
    pub async fn remove_page(&self, station: &StationId) {
        self.pages.write().await.remove(station);
    }

    /// Stations with a page available, sorted.
    pub async fn available_stations(&self) -> Vec<StationId> {
        let pages = self.pages.read().await;
        let mut ids: Vec<_> = pages.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl PageSource for MockPageSource {
    async fn fetch(&self, station: &StationId) -> Result<String, FetchError> {
        let pages = self.pages.read().await;
        pages
            .get(station)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(station.clone()))
    }
}
