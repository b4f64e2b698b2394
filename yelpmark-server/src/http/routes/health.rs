//! Health check endpoint
//!
//! Reports the crate version and whether the store answers a ping. The
//! directory is not probed so health checks never spend API quota.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::db::ping;
use crate::http::server::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreHealth {
    Ok,
    Unavailable,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the store is unreachable
    pub status: &'static str,
    pub version: &'static str,
    pub store: StoreHealth,
}

impl HealthResponse {
    fn new(store: StoreHealth) -> (StatusCode, Json<Self>) {
        let (code, status) = match store {
            StoreHealth::Ok => (StatusCode::OK, "ok"),
            StoreHealth::Unavailable => (StatusCode::SERVICE_UNAVAILABLE, "degraded"),
        };
        (
            code,
            Json(Self {
                status,
                version: env!("CARGO_PKG_VERSION"),
                store,
            }),
        )
    }
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let store = match ping(&state.pool).await {
        Ok(()) => StoreHealth::Ok,
        Err(e) => {
            tracing::warn!(error = %e, "health check: store unavailable");
            StoreHealth::Unavailable
        }
    };
    HealthResponse::new(store)
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
