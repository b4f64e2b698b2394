//! Collection endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::db::{acquire, Collection, CollectionRepo, StoreError};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ApiPath};
use crate::http::server::AppState;
use crate::models::CollectionName;

/// Create/update collection request
#[derive(Deserialize)]
pub struct CollectionRequest {
    pub name: String,
    pub description: Option<String>,
}

/// POST /v1/collections - create a collection
async fn create_collection(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CollectionRequest>,
) -> Result<(StatusCode, Json<Collection>), ApiError> {
    let name = CollectionName::new(&req.name)?;

    let mut conn = acquire(&state.pool).await?;
    let collection = CollectionRepo::new(&mut conn, state.timestamps)
        .create(&name, req.description.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(collection)))
}

/// GET /v1/collections - list all collections
async fn list_collections(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Collection>>, ApiError> {
    let mut conn = acquire(&state.pool).await?;
    let collections = CollectionRepo::new(&mut conn, state.timestamps).list().await?;
    Ok(Json(collections))
}

/// GET /v1/collections/{id} - get a single collection
async fn get_collection(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Collection>, ApiError> {
    let mut conn = acquire(&state.pool).await?;
    let collection = CollectionRepo::new(&mut conn, state.timestamps)
        .get(id)
        .await?
        .ok_or_else(|| StoreError::not_found("collection", id))?;
    Ok(Json(collection))
}

/// PUT /v1/collections/{id} - replace name and description
async fn update_collection(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(req): ApiJson<CollectionRequest>,
) -> Result<Json<Collection>, ApiError> {
    let name = CollectionName::new(&req.name)?;

    let mut conn = acquire(&state.pool).await?;
    let collection = CollectionRepo::new(&mut conn, state.timestamps)
        .update(id, &name, req.description.as_deref())
        .await?
        .ok_or_else(|| StoreError::not_found("collection", id))?;
    Ok(Json(collection))
}

/// DELETE /v1/collections/{id}
async fn delete_collection(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, ApiError> {
    let mut conn = acquire(&state.pool).await?;
    CollectionRepo::new(&mut conn, state.timestamps)
        .delete(id)
        .await?;
    Ok(StatusCode::OK)
}

/// Collection routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/v1/collections",
            get(list_collections).post(create_collection),
        )
        .route(
            "/v1/collections/{id}",
            get(get_collection)
                .put(update_collection)
                .delete(delete_collection),
        )
}
