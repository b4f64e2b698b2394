//! One request's store session
//!
//! Wraps a single pooled connection so several reads can be issued at once.
//! They queue on the connection in issue order, like statements sent down a
//! single client. The connection returns to the pool when the session drops.

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};
use tokio::sync::Mutex;

use super::{acquire, Bookmark, BookmarkRepo, Collection, CollectionRepo, StoreError, TimestampPolicy};
use crate::store_view::StoreReads;

pub struct PgSession {
    conn: Mutex<PoolConnection<Postgres>>,
    policy: TimestampPolicy,
}

impl PgSession {
    /// Check a connection out of the pool.
    pub async fn acquire(pool: &PgPool, policy: TimestampPolicy) -> Result<Self, StoreError> {
        let conn = acquire(pool).await?;
        Ok(Self {
            conn: Mutex::new(conn),
            policy,
        })
    }
}

#[async_trait]
impl StoreReads for PgSession {
    async fn all_bookmarks(&self) -> Result<Vec<Bookmark>, StoreError> {
        let mut conn = self.conn.lock().await;
        let bookmarks = BookmarkRepo::new(&mut conn, self.policy).list().await?;
        Ok(bookmarks)
    }

    async fn all_collections(&self) -> Result<Vec<Collection>, StoreError> {
        let mut conn = self.conn.lock().await;
        let collections = CollectionRepo::new(&mut conn, self.policy).list().await?;
        Ok(collections)
    }
}
