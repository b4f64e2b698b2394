//! Schema bootstrap for a fresh database
//!
//! Idempotent `CREATE TABLE IF NOT EXISTS` statements. Timestamps are naive.
//! Column defaults are UTC; the repositories bind their own values through
//! the configured [`TimestampPolicy`](super::TimestampPolicy).

use sqlx::PgPool;

use super::StoreError;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS collections (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        created_at TIMESTAMP NOT NULL DEFAULT (NOW() AT TIME ZONE 'UTC'),
        updated_at TIMESTAMP NOT NULL DEFAULT (NOW() AT TIME ZONE 'UTC')
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS venues (
        id SERIAL PRIMARY KEY,
        yelp_id TEXT NOT NULL UNIQUE,
        created_at TIMESTAMP NOT NULL DEFAULT (NOW() AT TIME ZONE 'UTC'),
        updated_at TIMESTAMP NOT NULL DEFAULT (NOW() AT TIME ZONE 'UTC')
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS bookmarks (
        id SERIAL PRIMARY KEY,
        venue_id INTEGER NOT NULL REFERENCES venues(id),
        notes TEXT,
        created_at TIMESTAMP NOT NULL DEFAULT (NOW() AT TIME ZONE 'UTC'),
        updated_at TIMESTAMP NOT NULL DEFAULT (NOW() AT TIME ZONE 'UTC')
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS bookmark_collections (
        bookmark_id INTEGER NOT NULL REFERENCES bookmarks(id) ON DELETE CASCADE,
        collection_id INTEGER NOT NULL REFERENCES collections(id) ON DELETE CASCADE,
        PRIMARY KEY (bookmark_id, collection_id)
    )
    "#,
];

/// Create any missing tables.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    tracing::info!("Ensuring store schema...");

    let mut conn = super::acquire(pool).await?;
    for statement in STATEMENTS {
        sqlx::query(statement).execute(&mut *conn).await?;
    }

    tracing::info!("Store schema ready");
    Ok(())
}
