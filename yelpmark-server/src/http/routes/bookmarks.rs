//! Bookmark endpoints
//!
//! Creating a bookmark resolves its venue first (get-or-create by `yelp_id`).

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, post, put},
    Json, Router,
};
use serde::Deserialize;

use crate::db::{acquire, Bookmark, BookmarkRepo, StoreError, VenueRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ApiPath};
use crate::http::server::AppState;
use crate::models::ExternalId;

/// Create bookmark request
#[derive(Deserialize)]
pub struct CreateBookmarkRequest {
    pub yelp_id: String,
    pub notes: Option<String>,
}

/// Update bookmark request
#[derive(Deserialize)]
pub struct UpdateBookmarkRequest {
    pub notes: Option<String>,
}

/// Add-to-collection request; `id` is the collection id
#[derive(Deserialize)]
pub struct CollectionRef {
    pub id: i32,
}

/// POST /v1/bookmarks - bookmark a business
async fn create_bookmark(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateBookmarkRequest>,
) -> Result<(StatusCode, Json<Bookmark>), ApiError> {
    let yelp_id = ExternalId::new(&req.yelp_id)?;

    let mut conn = acquire(&state.pool).await?;
    let venue = VenueRepo::new(&mut conn, state.timestamps)
        .get_or_create(&yelp_id)
        .await?;
    let bookmark = BookmarkRepo::new(&mut conn, state.timestamps)
        .create(venue.id, req.notes.as_deref())
        .await?;

    tracing::debug!(bookmark_id = bookmark.id, venue_id = venue.id, "bookmark created");
    Ok((StatusCode::CREATED, Json(bookmark)))
}

/// PUT /v1/bookmarks/{id} - replace the notes
async fn update_bookmark(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(req): ApiJson<UpdateBookmarkRequest>,
) -> Result<(StatusCode, Json<Bookmark>), ApiError> {
    let mut conn = acquire(&state.pool).await?;
    let bookmark = BookmarkRepo::new(&mut conn, state.timestamps)
        .update_notes(id, req.notes.as_deref())
        .await?
        .ok_or_else(|| StoreError::not_found("bookmark", id))?;

    // the front end expects 201 here
    Ok((StatusCode::CREATED, Json(bookmark)))
}

/// DELETE /v1/bookmarks/{id}
async fn delete_bookmark(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, ApiError> {
    let mut conn = acquire(&state.pool).await?;
    BookmarkRepo::new(&mut conn, state.timestamps)
        .delete(id)
        .await?;
    Ok(StatusCode::OK)
}

/// POST /v1/bookmarks/{id}/collections - add to a collection
async fn add_to_collection(
    State(state): State<Arc<AppState>>,
    ApiPath(bookmark_id): ApiPath<i32>,
    ApiJson(collection): ApiJson<CollectionRef>,
) -> Result<StatusCode, ApiError> {
    let mut conn = acquire(&state.pool).await?;
    BookmarkRepo::new(&mut conn, state.timestamps)
        .add_to_collection(bookmark_id, collection.id)
        .await?;
    Ok(StatusCode::CREATED)
}

/// DELETE /v1/bookmarks/{id}/collections/{collection_id} - remove from a collection
async fn remove_from_collection(
    State(state): State<Arc<AppState>>,
    ApiPath((bookmark_id, collection_id)): ApiPath<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    let mut conn = acquire(&state.pool).await?;
    BookmarkRepo::new(&mut conn, state.timestamps)
        .remove_from_collection(bookmark_id, collection_id)
        .await?;
    Ok(StatusCode::OK)
}

/// Bookmark routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/bookmarks", post(create_bookmark))
        .route(
            "/v1/bookmarks/{id}",
            put(update_bookmark).delete(delete_bookmark),
        )
        .route("/v1/bookmarks/{id}/collections", post(add_to_collection))
        .route(
            "/v1/bookmarks/{id}/collections/{collection_id}",
            delete(remove_from_collection),
        )
}
