//! Web layer for the station alias service.
//!
//! Provides the HTTP endpoints for resolving and managing station aliases.

mod dto;
mod error;
mod extract;
mod routes;
mod state;

pub use dto::*;
pub use error::AppError;
pub use extract::Authenticated;
pub use routes::create_router;
pub use state::AppState;
