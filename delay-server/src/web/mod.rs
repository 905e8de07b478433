//! Web layer for the delay registry.
//!
//! Serves the three HTML tabs and a JSON API over the same operations.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
