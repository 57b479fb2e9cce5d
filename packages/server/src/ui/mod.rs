//! UI layer: the axum server that exposes sessions over WebSocket and the HTTP API.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::{Server, ServerError};
pub use state::AppState;
