//! Business directory access
//!
//! The aggregation core and the search proxy talk to the directory through
//! the [`Directory`] trait; [`YelpClient`] is the production implementation.

pub mod error;
pub mod yelp;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use error::DirectoryError;
pub use yelp::{DirectoryConfig, YelpClient, DEFAULT_API_HOST};

/// Directory data for one business. Opaque to this crate; passed through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectoryRecord(pub serde_json::Value);

/// Read access to the business directory
#[async_trait]
pub trait Directory: Send + Sync {
    /// Fetch the record for one business by its external id.
    async fn business(&self, external_id: &str) -> Result<DirectoryRecord, DirectoryError>;

    /// Run a business search, forwarding the query pairs unchanged.
    async fn search(&self, query: &[(String, String)]) -> Result<serde_json::Value, DirectoryError>;
}
