//! Bookmark repository
//!
//! Every bookmark row is returned with its venue's `yelp_id` and the ids of
//! the collections it belongs to, so callers never need a second query.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, Row};

use crate::db::{StoreError, TimestampPolicy};

/// Bookmark record, denormalized with its venue and memberships
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bookmark {
    pub id: i32,
    pub venue_id: i32,
    pub yelp_id: String,
    pub notes: Option<String>,
    pub collections: Vec<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bookmark {
    fn from_row(row: &PgRow, policy: TimestampPolicy) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            venue_id: row.try_get("venue_id")?,
            yelp_id: row.try_get("yelp_id")?,
            notes: row.try_get("notes")?,
            collections: row.try_get("collections")?,
            created_at: policy.resolve(row.try_get::<NaiveDateTime, _>("created_at")?),
            updated_at: policy.resolve(row.try_get::<NaiveDateTime, _>("updated_at")?),
        })
    }
}

/// Bookmark repository
pub struct BookmarkRepo<'a> {
    conn: &'a mut PgConnection,
    policy: TimestampPolicy,
}

impl<'a> BookmarkRepo<'a> {
    pub fn new(conn: &'a mut PgConnection, policy: TimestampPolicy) -> Self {
        Self { conn, policy }
    }

    pub async fn create(&mut self, venue_id: i32, notes: Option<&str>) -> Result<Bookmark, StoreError> {
        let row = sqlx::query(
            r#"
            WITH inserted AS (
                INSERT INTO bookmarks (venue_id, notes, created_at, updated_at)
                VALUES ($1, $2, $3, $3)
                RETURNING id, venue_id, notes, created_at, updated_at
            )
            SELECT i.id, i.venue_id, v.yelp_id, i.notes, i.created_at, i.updated_at,
                   ARRAY[]::INTEGER[] AS collections
            FROM inserted i
            JOIN venues v ON v.id = i.venue_id
            "#,
        )
        .bind(venue_id)
        .bind(notes)
        .bind(self.policy.now())
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(Bookmark::from_row(&row, self.policy)?)
    }

    /// All bookmarks, most recently updated first.
    ///
    /// Single query: venue JOIN plus aggregated memberships (no N+1).
    pub async fn list(&mut self) -> Result<Vec<Bookmark>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT
                b.id,
                b.venue_id,
                v.yelp_id,
                b.notes,
                b.created_at,
                b.updated_at,
                COALESCE(
                    ARRAY_AGG(bc.collection_id ORDER BY bc.collection_id)
                        FILTER (WHERE bc.collection_id IS NOT NULL),
                    ARRAY[]::INTEGER[]
                ) AS collections
            FROM bookmarks b
            JOIN venues v ON v.id = b.venue_id
            LEFT JOIN bookmark_collections bc ON bc.bookmark_id = b.id
            GROUP BY b.id, v.yelp_id
            ORDER BY b.updated_at DESC
            "#,
        )
        .fetch_all(&mut *self.conn)
        .await?;

        let bookmarks = rows
            .iter()
            .map(|r| Bookmark::from_row(r, self.policy))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(bookmarks)
    }

    /// Replace the notes. Returns `None` when the id is unknown.
    pub async fn update_notes(
        &mut self,
        id: i32,
        notes: Option<&str>,
    ) -> Result<Option<Bookmark>, StoreError> {
        let row = sqlx::query(
            r#"
            WITH updated AS (
                UPDATE bookmarks
                SET notes = $1, updated_at = $2
                WHERE id = $3
                RETURNING id, venue_id, notes, created_at, updated_at
            )
            SELECT u.id, u.venue_id, v.yelp_id, u.notes, u.created_at, u.updated_at,
                   COALESCE(
                       (SELECT ARRAY_AGG(bc.collection_id ORDER BY bc.collection_id)
                        FROM bookmark_collections bc
                        WHERE bc.bookmark_id = u.id),
                       ARRAY[]::INTEGER[]
                   ) AS collections
            FROM updated u
            JOIN venues v ON v.id = u.venue_id
            "#,
        )
        .bind(notes)
        .bind(self.policy.now())
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(|r| Bookmark::from_row(&r, self.policy)).transpose()?)
    }

    /// Delete a bookmark and its memberships. The venue is kept.
    pub async fn delete(&mut self, id: i32) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM bookmarks WHERE id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }

    /// Add a bookmark to a collection. Adding an existing pair is a no-op.
    pub async fn add_to_collection(
        &mut self,
        bookmark_id: i32,
        collection_id: i32,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO bookmark_collections (bookmark_id, collection_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(bookmark_id)
        .bind(collection_id)
        .execute(&mut *self.conn)
        .await?;
        Ok(())
    }

    pub async fn remove_from_collection(
        &mut self,
        bookmark_id: i32,
        collection_id: i32,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            DELETE FROM bookmark_collections
            WHERE bookmark_id = $1 AND collection_id = $2
            "#,
        )
        .bind(bookmark_id)
        .bind(collection_id)
        .execute(&mut *self.conn)
        .await?;
        Ok(())
    }
}
