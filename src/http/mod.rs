//! Axum HTTP server handlers for the LTI dynamic registration endpoints.

pub mod context;
mod handler_continue_registration;
mod handler_registration;
pub mod server;

pub use context::{AppEngine, AppState};
pub use server::build_router;
