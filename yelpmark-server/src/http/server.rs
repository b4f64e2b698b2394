//! Axum server setup
//!
//! Server skeleton with:
//! - CORS only when an allowed origin is configured
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes;
use crate::db::TimestampPolicy;
use crate::directory::Directory;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8001)
    pub bind_addr: SocketAddr,

    /// Single origin allowed by CORS. `None` installs no CORS layer.
    pub cors_allow_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8001)),
            cors_allow_origin: None,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// How naive store timestamps are read
    pub timestamps: TimestampPolicy,
    pub directory: Arc<dyn Directory>,
}

impl AppState {
    pub fn new(pool: PgPool, directory: Arc<dyn Directory>) -> Self {
        Self {
            pool,
            timestamps: TimestampPolicy::default(),
            directory,
        }
    }

    pub fn with_timestamps(mut self, timestamps: TimestampPolicy) -> Self {
        self.timestamps = timestamps;
        self
    }
}

/// Build the application router.
pub fn build_router(state: AppState, cors_allow_origin: Option<&str>) -> Result<Router, ServerError> {
    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::search::router())
        .merge(routes::store::router())
        .merge(routes::collections::router())
        .merge(routes::bookmarks::router())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state));

    let app = match cors_allow_origin {
        Some(origin) => {
            let origin: HeaderValue = origin
                .parse()
                .map_err(|_| ServerError::InvalidCorsOrigin(origin.to_owned()))?;
            tracing::info!("Using CORS, allowing origin {:?}", origin);
            app.layer(
                CorsLayer::new()
                    .allow_origin(origin)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
        }
        None => app,
    };

    Ok(app)
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&database_url).await?;
/// let directory = Arc::new(YelpClient::new(DirectoryConfig::new(api_key))?);
/// run_server(AppState::new(pool, directory), ServerConfig::default()).await?;
/// ```
pub async fn run_server(state: AppState, config: ServerConfig) -> Result<(), ServerError> {
    tracing::info!(timestamps = %state.timestamps, "store timestamp policy");
    let app = build_router(state, config.cors_allow_origin.as_deref())?;

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on http://{}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid CORS origin: {0}")]
    InvalidCorsOrigin(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{DirectoryError, DirectoryRecord};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use std::time::Duration;
    use tower::ServiceExt;

    /// Directory that answers every search with an echo of its query.
    struct EchoDirectory;

    #[async_trait]
    impl Directory for EchoDirectory {
        async fn business(&self, external_id: &str) -> Result<DirectoryRecord, DirectoryError> {
            Ok(DirectoryRecord(json!({"id": external_id})))
        }

        async fn search(&self, query: &[(String, String)]) -> Result<Value, DirectoryError> {
            if query.iter().any(|(_, v)| v == "ratelimit") {
                return Err(DirectoryError::Upstream {
                    status: 429,
                    name: "TOO_MANY_REQUESTS_PER_SECOND".into(),
                    message: "slow down".into(),
                });
            }
            Ok(json!({ "query": query }))
        }
    }

    /// Router whose store is unreachable (nothing listens on port 1).
    fn app() -> Router {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(1))
            .connect_lazy("postgres://yelpmark@127.0.0.1:1/yelpmark")
            .expect("lazy pool");
        build_router(AppState::new(pool, Arc::new(EchoDirectory)), None).expect("router")
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8001);
        assert!(config.cors_allow_origin.is_none());
    }

    #[tokio::test]
    async fn health_reports_unreachable_store() {
        let (status, body) = send(
            app(),
            Request::builder().uri("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["store"], "unavailable");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn search_proxies_query() {
        let (status, body) = send(
            app(),
            Request::builder()
                .uri("/v1/search?term=tacos&location=sf")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["query"], json!([["term", "tacos"], ["location", "sf"]]));
    }

    #[tokio::test]
    async fn search_passes_upstream_status_through() {
        let (status, body) = send(
            app(),
            Request::builder()
                .uri("/v1/search?term=ratelimit")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"]["name"], "TOO_MANY_REQUESTS_PER_SECOND");
    }

    #[tokio::test]
    async fn store_view_reports_unreachable_store() {
        let (status, body) = send(
            app(),
            Request::builder().uri("/v1/store").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["name"], "DbError");
    }

    #[tokio::test]
    async fn malformed_json_is_validation_error() {
        let (status, body) = send(app(), post_json("/v1/collections", "{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["name"], "ValidationError");
    }

    #[tokio::test]
    async fn blank_collection_name_rejected_before_store() {
        let (status, body) = send(
            app(),
            post_json("/v1/collections", r#"{"name": "  ", "description": null}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "collection name cannot be empty");
    }

    #[tokio::test]
    async fn bad_yelp_id_rejected_before_store() {
        let (status, body) = send(
            app(),
            post_json("/v1/bookmarks", r#"{"yelp_id": "../etc", "notes": "x"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["name"], "ValidationError");
    }

    #[tokio::test]
    async fn non_numeric_id_is_validation_error() {
        let (status, body) = send(
            app(),
            Request::builder()
                .uri("/v1/collections/abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["name"], "ValidationError");
    }

    #[tokio::test]
    async fn cors_origin_is_echoed() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://yelpmark@127.0.0.1:1/yelpmark")
            .expect("lazy pool");
        let app = build_router(
            AppState::new(pool, Arc::new(EchoDirectory)),
            Some("http://localhost:8000"),
        )
        .expect("router");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/search?term=tacos")
                    .header("origin", "http://localhost:8000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:8000"
        );
    }

    #[tokio::test]
    async fn invalid_cors_origin_rejected() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://yelpmark@127.0.0.1:1/yelpmark")
            .expect("lazy pool");
        let err = build_router(
            AppState::new(pool, Arc::new(EchoDirectory)),
            Some("http://bad\norigin"),
        )
        .unwrap_err();
        assert!(matches!(err, ServerError::InvalidCorsOrigin(_)));
    }
}
