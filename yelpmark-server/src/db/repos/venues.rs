//! Venue repository
//!
//! Venues are created lazily the first time a business is bookmarked and are
//! never updated or deleted here.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, Row};

use crate::db::{StoreError, TimestampPolicy};
use crate::models::ExternalId;

/// Venue record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Venue {
    pub id: i32,
    pub yelp_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Venue {
    fn from_row(row: &PgRow, policy: TimestampPolicy) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            yelp_id: row.try_get("yelp_id")?,
            created_at: policy.resolve(row.try_get::<NaiveDateTime, _>("created_at")?),
            updated_at: policy.resolve(row.try_get::<NaiveDateTime, _>("updated_at")?),
        })
    }
}

/// Venue repository
pub struct VenueRepo<'a> {
    conn: &'a mut PgConnection,
    policy: TimestampPolicy,
}

impl<'a> VenueRepo<'a> {
    pub fn new(conn: &'a mut PgConnection, policy: TimestampPolicy) -> Self {
        Self { conn, policy }
    }

    pub async fn find_by_yelp_id(&mut self, yelp_id: &ExternalId) -> Result<Option<Venue>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, yelp_id, created_at, updated_at
            FROM venues
            WHERE yelp_id = $1
            "#,
        )
        .bind(yelp_id.as_str())
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(|r| Venue::from_row(&r, self.policy)).transpose()?)
    }

    /// Return the venue for `yelp_id`, inserting it if absent.
    ///
    /// The lookup runs first so the common case never writes. A miss falls
    /// through to an upsert on the `yelp_id` unique constraint, so two
    /// requests creating the same venue at once still end up with one row.
    pub async fn get_or_create(&mut self, yelp_id: &ExternalId) -> Result<Venue, StoreError> {
        if let Some(venue) = self.find_by_yelp_id(yelp_id).await? {
            return Ok(venue);
        }

        let row = sqlx::query(
            r#"
            INSERT INTO venues (yelp_id, created_at, updated_at)
            VALUES ($1, $2, $2)
            ON CONFLICT (yelp_id) DO UPDATE SET yelp_id = EXCLUDED.yelp_id
            RETURNING id, yelp_id, created_at, updated_at
            "#,
        )
        .bind(yelp_id.as_str())
        .bind(self.policy.now())
        .fetch_one(&mut *self.conn)
        .await?;

        let venue = Venue::from_row(&row, self.policy)?;
        tracing::debug!(venue_id = venue.id, yelp_id = %venue.yelp_id, "venue created");
        Ok(venue)
    }
}
