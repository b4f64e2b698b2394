//! Collection repository
//!
//! Plain CRUD. Membership lives in `bookmark_collections` and is handled by
//! [`BookmarkRepo`](super::BookmarkRepo).

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, Row};

use crate::db::{StoreError, TimestampPolicy};
use crate::models::CollectionName;

/// Collection record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collection {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Collection {
    fn from_row(row: &PgRow, policy: TimestampPolicy) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            created_at: policy.resolve(row.try_get::<NaiveDateTime, _>("created_at")?),
            updated_at: policy.resolve(row.try_get::<NaiveDateTime, _>("updated_at")?),
        })
    }
}

/// Collection repository
pub struct CollectionRepo<'a> {
    conn: &'a mut PgConnection,
    policy: TimestampPolicy,
}

impl<'a> CollectionRepo<'a> {
    pub fn new(conn: &'a mut PgConnection, policy: TimestampPolicy) -> Self {
        Self { conn, policy }
    }

    pub async fn create(
        &mut self,
        name: &CollectionName,
        description: Option<&str>,
    ) -> Result<Collection, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO collections (name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(name.as_str())
        .bind(description)
        .bind(self.policy.now())
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(Collection::from_row(&row, self.policy)?)
    }

    /// All collections, most recently updated first.
    pub async fn list(&mut self) -> Result<Vec<Collection>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM collections
            ORDER BY updated_at DESC
            "#,
        )
        .fetch_all(&mut *self.conn)
        .await?;

        let collections = rows
            .iter()
            .map(|r| Collection::from_row(r, self.policy))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(collections)
    }

    pub async fn get(&mut self, id: i32) -> Result<Option<Collection>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM collections
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row
            .map(|r| Collection::from_row(&r, self.policy))
            .transpose()?)
    }

    /// Replace name and description. Returns `None` when the id is unknown.
    pub async fn update(
        &mut self,
        id: i32,
        name: &CollectionName,
        description: Option<&str>,
    ) -> Result<Option<Collection>, StoreError> {
        let row = sqlx::query(
            r#"
            UPDATE collections
            SET name = $1, description = $2, updated_at = $3
            WHERE id = $4
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(name.as_str())
        .bind(description)
        .bind(self.policy.now())
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row
            .map(|r| Collection::from_row(&r, self.policy))
            .transpose()?)
    }

    /// Delete a collection. Memberships go with it; bookmarks stay.
    pub async fn delete(&mut self, id: i32) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM collections WHERE id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{acquire, create_pool, schema};

    // Integration tests - run with DATABASE_URL set
    // cargo test -p yelpmark-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn collection_crud() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool");
        schema::ensure_schema(&pool).await.expect("schema");
        let mut conn = acquire(&pool).await.expect("acquire");
        let mut repo = CollectionRepo::new(&mut conn, TimestampPolicy::Utc);

        let name = CollectionName::new("Faves").unwrap();
        let created = repo.create(&name, Some("the good ones")).await.unwrap();
        assert_eq!(created.name, "Faves");

        let renamed = CollectionName::new("Best").unwrap();
        let updated = repo
            .update(created.id, &renamed, None)
            .await
            .unwrap()
            .expect("row exists");
        assert_eq!(updated.name, "Best");
        assert_eq!(updated.description, None);
        assert!(updated.updated_at >= created.updated_at);

        repo.delete(created.id).await.unwrap();
        assert!(repo.get(created.id).await.unwrap().is_none());
        assert!(repo.update(created.id, &renamed, None).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn offset_policy_keeps_update_after_create() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool");
        schema::ensure_schema(&pool).await.expect("schema");
        let mut conn = acquire(&pool).await.expect("acquire");
        let policy: TimestampPolicy = "+02:00".parse().unwrap();
        let mut repo = CollectionRepo::new(&mut conn, policy);

        let before = Utc::now() - chrono::TimeDelta::seconds(5);
        let name = CollectionName::new("Offset").unwrap();
        let created = repo.create(&name, None).await.unwrap();
        let updated = repo.update(created.id, &name, None).await.unwrap().expect("row");

        assert!(created.created_at >= before);
        assert!(updated.updated_at >= created.created_at);
        repo.delete(created.id).await.unwrap();
    }
}
