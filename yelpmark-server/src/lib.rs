//! yelpmark-server: bookmark store and Yelp proxy backend
//!
//! Persists bookmarks of businesses into named collections in PostgreSQL and
//! proxies the Yelp business directory. The front end loads everything it
//! needs in one call, `GET /v1/store`, assembled by [`store_view`].

pub mod db;
pub mod directory;
pub mod http;
pub mod models;
pub mod store_view;

pub use db::{StoreError, TimestampPolicy};
pub use directory::{Directory, DirectoryConfig, DirectoryError, YelpClient};
pub use http::{run_server, AppState, ServerConfig};
pub use store_view::{build_store_view, StoreView, StoreViewError};
