//! Store view endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::db::PgSession;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::store_view::{build_store_view, StoreView};

/// GET /v1/store - bookmarks, collections and their directory records
async fn get_store(State(state): State<Arc<AppState>>) -> Result<Json<StoreView>, ApiError> {
    let session = PgSession::acquire(&state.pool, state.timestamps).await?;
    let view = build_store_view(&session, state.directory.as_ref()).await;
    drop(session);

    Ok(Json(view?))
}

/// Store routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/v1/store", get(get_store))
}
