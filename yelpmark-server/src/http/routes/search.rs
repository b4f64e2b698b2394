//! Directory search proxy

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::http::error::ApiError;
use crate::http::server::AppState;

/// GET /v1/search - forward the query string to the directory search
async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let results = state.directory.search(&query).await?;
    Ok(Json(results))
}

/// Search routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/v1/search", get(search))
}
