//! Store view aggregation
//!
//! Builds the single document the front end loads on start:
//!
//! ```text
//! { "bookmarks": {id: Bookmark}, "collections": {id: Collection}, "yelp": {yelp_id: record} }
//! ```
//!
//! Two phases, each fanned out concurrently and each all-or-nothing:
//!
//! 1. bookmarks and collections are read from the store session;
//! 2. one directory lookup runs per bookmark.
//!
//! Any failure aborts the whole view. Partial results are dropped, never returned.

use std::collections::BTreeMap;
use std::pin::pin;

use async_trait::async_trait;
use futures::future::{self, try_join_all, Either};
use serde::Serialize;

use crate::db::{Bookmark, Collection, StoreError};
use crate::directory::{Directory, DirectoryError, DirectoryRecord};

/// The reads the store view needs from one store session
#[async_trait]
pub trait StoreReads: Send + Sync {
    async fn all_bookmarks(&self) -> Result<Vec<Bookmark>, StoreError>;
    async fn all_collections(&self) -> Result<Vec<Collection>, StoreError>;
}

/// Aggregated response for `GET /v1/store`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreView {
    pub bookmarks: BTreeMap<i32, Bookmark>,
    pub collections: BTreeMap<i32, Collection>,
    pub yelp: BTreeMap<String, DirectoryRecord>,
}

/// Which backend sank the store view
#[derive(Debug, thiserror::Error)]
pub enum StoreViewError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Index records by a key. A later record with the same key replaces an earlier one.
///
/// # Example
/// ```
/// use yelpmark_server::store_view::index_by;
///
/// let index = index_by(vec![(1, "a"), (2, "b"), (1, "c")], |r| r.0);
/// assert_eq!(index.len(), 2);
/// assert_eq!(index[&1], (1, "c"));
/// ```
pub fn index_by<K, T, I, F>(items: I, key: F) -> BTreeMap<K, T>
where
    K: Ord,
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> K,
{
    items.into_iter().map(|item| (key(&item), item)).collect()
}

/// Build the store view from one store session and the directory.
///
/// The caller owns the session and releases it once this returns, on success
/// and failure alike.
pub async fn build_store_view<S, D>(store: &S, directory: &D) -> Result<StoreView, StoreViewError>
where
    S: StoreReads + ?Sized,
    D: Directory + ?Sized,
{
    let (bookmarks, collections) = read_store(store).await?;

    // One lookup per bookmark. Bookmarks sharing a venue each get their own call.
    tracing::debug!(
        bookmarks = bookmarks.len(),
        collections = collections.len(),
        lookups = bookmarks.len(),
        "store reads complete, starting directory lookups"
    );

    let lookups = bookmarks.iter().map(|bookmark| async move {
        let record = directory.business(&bookmark.yelp_id).await?;
        Ok::<_, DirectoryError>((bookmark.yelp_id.clone(), record))
    });
    let records = try_join_all(lookups).await?;

    Ok(StoreView {
        yelp: records.into_iter().collect(),
        bookmarks: index_by(bookmarks, |b| b.id),
        collections: index_by(collections, |c| c.id),
    })
}

/// Run both store reads concurrently.
///
/// Returns as soon as the outcome is known. A bookmark failure is always the
/// one reported, so a collection failure that lands first still waits for
/// the bookmark read.
async fn read_store<S>(store: &S) -> Result<(Vec<Bookmark>, Vec<Collection>), StoreError>
where
    S: StoreReads + ?Sized,
{
    let bookmarks = pin!(store.all_bookmarks());
    let collections = pin!(store.all_collections());

    match future::select(bookmarks, collections).await {
        Either::Left((bookmarks, collections)) => {
            let bookmarks = bookmarks?;
            Ok((bookmarks, collections.await?))
        }
        Either::Right((collections, bookmarks)) => {
            let bookmarks = bookmarks.await?;
            Ok((bookmarks, collections?))
        }
    }
}
