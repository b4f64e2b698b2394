//! HTTP server layer
//!
//! Axum server with:
//! - Optional single-origin CORS
//! - Request tracing
//! - Graceful shutdown
//! - JSON error envelopes

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
