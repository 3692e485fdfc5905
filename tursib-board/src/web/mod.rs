//! Web layer exposing station boards.
//!
//! Each board is served in sensor shape: the next departure time as the
//! state and the full snapshot as attributes.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
