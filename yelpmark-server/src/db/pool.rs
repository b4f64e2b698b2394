//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits.

use sqlx::pool::PoolConnection;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, PgPool, Postgres};

use super::StoreError;

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Create a PostgreSQL connection pool.
///
/// # Errors
///
/// Returns an error if the first connection cannot be established.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool("postgres://localhost:5432/elm-yelp-app").await?;
/// ```
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    create_pool_with_options(database_url, DEFAULT_MAX_CONNECTIONS).await
}

/// Create a PostgreSQL connection pool with custom options.
pub async fn create_pool_with_options(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Check one connection out of the pool for the duration of a request.
///
/// The connection goes back to the pool when the returned guard is dropped,
/// so every exit path of a handler releases it exactly once.
pub async fn acquire(pool: &PgPool) -> Result<PoolConnection<Postgres>, StoreError> {
    pool.acquire().await.map_err(|err| {
        tracing::error!(error = %err, "failed to acquire store connection");
        StoreError::connection(err)
    })
}

/// Round-trip one connection to the server.
pub async fn ping(pool: &PgPool) -> Result<(), StoreError> {
    let mut conn = acquire(pool).await?;
    conn.ping().await?;
    Ok(())
}
