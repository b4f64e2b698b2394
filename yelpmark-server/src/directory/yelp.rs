//! Yelp Fusion API client
//!
//! Bearer-token REST client for business lookups and search.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::{Directory, DirectoryError, DirectoryRecord};

/// Default API host (no trailing slash)
pub const DEFAULT_API_HOST: &str = "https://api.yelp.com/v3";

/// Directory client configuration
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Base URL, e.g. `https://api.yelp.com/v3`
    pub base_url: String,
    /// API key sent as a bearer token
    pub api_key: String,
    /// Per-request timeout. `None` waits as long as the upstream takes.
    pub timeout: Option<Duration>,
}

impl DirectoryConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_API_HOST.to_string(),
            api_key: api_key.into(),
            timeout: None,
        }
    }
}

/// Yelp directory client
pub struct YelpClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl YelpClient {
    pub fn new(config: DirectoryConfig) -> Result<Self, DirectoryError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(DirectoryError::transport)?;

        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(DirectoryError::transport)?;
        if base_url.cannot_be_a_base() {
            return Err(DirectoryError::transport(format!(
                "directory base URL cannot take a path: {}",
                config.base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }

    /// Base URL with `segments` appended, each percent-encoded as one segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json(
        &self,
        url: Url,
        query: &[(String, String)],
    ) -> Result<serde_json::Value, DirectoryError> {
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(url = %url, error = %e, "directory request failed");
                DirectoryError::transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(url = %url, status = status.as_u16(), "directory returned error status");
            return Err(DirectoryError::upstream(status, &body));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(DirectoryError::transport)
    }
}

#[async_trait]
impl Directory for YelpClient {
    async fn business(&self, external_id: &str) -> Result<DirectoryRecord, DirectoryError> {
        let url = self.endpoint(&["businesses", external_id]);
        self.get_json(url, &[]).await.map(DirectoryRecord)
    }

    async fn search(&self, query: &[(String, String)]) -> Result<serde_json::Value, DirectoryError> {
        let url = self.endpoint(&["businesses", "search"]);
        self.get_json(url, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, Query};
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    const KEY: &str = "test-key";

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == format!("Bearer {KEY}"))
    }

    async fn business(headers: HeaderMap, Path(id): Path<String>) -> axum::response::Response {
        if !authorized(&headers) {
            return StatusCode::UNAUTHORIZED.into_response();
        }
        match id.as_str() {
            "missing" => (
                StatusCode::NOT_FOUND,
                Json(json!({"error": {"code": "BUSINESS_NOT_FOUND", "description": "nope"}})),
            )
                .into_response(),
            _ => Json(json!({"id": id, "name": "Cafe"})).into_response(),
        }
    }

    async fn search(
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
    ) -> axum::response::Response {
        if !authorized(&headers) {
            return StatusCode::UNAUTHORIZED.into_response();
        }
        Json(json!({"businesses": [], "echo": params})).into_response()
    }

    /// Serve a fake directory on an ephemeral port, returning its base URL.
    async fn spawn_upstream() -> String {
        let app = Router::new()
            .route("/businesses/search", get(search))
            .route("/businesses/{id}", get(business));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/")
    }

    fn client(base_url: String, api_key: &str) -> YelpClient {
        YelpClient::new(DirectoryConfig {
            base_url,
            api_key: api_key.into(),
            timeout: Some(Duration::from_secs(5)),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn business_lookup_returns_record() {
        let client = client(spawn_upstream().await, KEY);
        let record = client.business("abc").await.unwrap();
        assert_eq!(record, DirectoryRecord(json!({"id": "abc", "name": "Cafe"})));
    }

    #[tokio::test]
    async fn business_id_is_sent_as_one_encoded_segment() {
        let client = client(spawn_upstream().await, KEY);
        for id in ["café-de-flore-paris", "100%-pure", "a;b"] {
            let record = client.business(id).await.unwrap();
            assert_eq!(record.0["id"], id);
        }
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let client = client("https://api.yelp.com/v3/".into(), KEY);
        assert_eq!(
            client.endpoint(&["businesses", "café"]).as_str(),
            "https://api.yelp.com/v3/businesses/caf%C3%A9"
        );
        assert_eq!(
            client.endpoint(&["businesses", "search"]).as_str(),
            "https://api.yelp.com/v3/businesses/search"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        let err = YelpClient::new(DirectoryConfig {
            base_url: "not a url".into(),
            api_key: KEY.into(),
            timeout: None,
        })
        .err()
        .expect("invalid base url");
        assert!(matches!(err, DirectoryError::Transport { .. }));
    }

    #[tokio::test]
    async fn upstream_error_carries_status_and_code() {
        let client = client(spawn_upstream().await, KEY);
        let err = client.business("missing").await.unwrap_err();
        assert_eq!(
            err,
            DirectoryError::Upstream {
                status: 404,
                name: "BUSINESS_NOT_FOUND".into(),
                message: "nope".into(),
            }
        );
    }

    #[tokio::test]
    async fn bad_credentials_surface_as_upstream_401() {
        let client = client(spawn_upstream().await, "wrong");
        let err = client.business("abc").await.unwrap_err();
        assert!(matches!(err, DirectoryError::Upstream { status: 401, .. }));
    }

    #[tokio::test]
    async fn search_forwards_query() {
        let client = client(spawn_upstream().await, KEY);
        let query = vec![
            ("term".to_string(), "tacos".to_string()),
            ("location".to_string(), "San Francisco".to_string()),
        ];
        let body = client.search(&query).await.unwrap();
        assert_eq!(body["echo"]["term"], "tacos");
        assert_eq!(body["echo"]["location"], "San Francisco");
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        // Nothing listens on port 1
        let client = client("http://127.0.0.1:1".into(), KEY);
        let err = client.business("abc").await.unwrap_err();
        assert!(matches!(err, DirectoryError::Transport { .. }));
    }
}
