//! Application state for the web layer.

use crate::board::BoardRegistry;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Station boards, kept fresh by the poller
    pub registry: BoardRegistry,
}

impl AppState {
    /// Create a new app state.
    pub fn new(registry: BoardRegistry) -> Self {
        Self { registry }
    }
}
