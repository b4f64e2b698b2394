//! Directory error types

use serde::Deserialize;

/// Failure talking to the business directory
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    /// The request never produced a usable response
    #[error("directory request failed: {message}")]
    Transport { message: String },

    /// The directory answered with a non-success status
    #[error("directory returned {status} {name}: {message}")]
    Upstream {
        status: u16,
        name: String,
        message: String,
    },
}

/// Yelp error body: `{"error": {"code": "...", "description": "..."}}`
#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    code: Option<String>,
    description: Option<String>,
}

impl DirectoryError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport {
            message: err.to_string(),
        }
    }

    /// Build an upstream error from a status and raw response body.
    ///
    /// Uses the directory's error code and description when the body has
    /// them, and the status reason phrase otherwise.
    pub fn upstream(status: reqwest::StatusCode, body: &str) -> Self {
        let reason = status.canonical_reason().unwrap_or("Upstream Error");
        let detail = serde_json::from_str::<ErrorBody>(body).ok().map(|b| b.error);

        let name = detail
            .as_ref()
            .and_then(|d| d.code.clone())
            .unwrap_or_else(|| reason.to_owned());
        let message = detail
            .and_then(|d| d.description)
            .unwrap_or_else(|| {
                let body = body.trim();
                if body.is_empty() {
                    reason.to_owned()
                } else {
                    body.chars().take(200).collect()
                }
            });

        Self::Upstream {
            status: status.as_u16(),
            name,
            message,
        }
    }
}
