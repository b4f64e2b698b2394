//! Custom Axum extractors
//!
//! Thin wrappers over `Json` and `Path` whose rejections are reported in the
//! API error envelope instead of axum's plain-text bodies.

use axum::extract::{FromRequest, FromRequestParts, Path};
use axum::Json;

use super::error::ApiError;

/// JSON request body
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters, e.g. `ApiPath<i32>` or `ApiPath<(i32, i32)>`
#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
