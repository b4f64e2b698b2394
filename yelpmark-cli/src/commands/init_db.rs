//! Create the store schema in an empty database

use anyhow::{Context, Result};
use clap::Parser;

use yelpmark_server::db::{create_pool, schema};

use super::DatabaseArgs;

/// Arguments for the init-db command
#[derive(Parser, Debug)]
pub struct InitDbArgs {
    #[command(flatten)]
    pub db: DatabaseArgs,
}

/// Create any missing tables
pub async fn run_init_db(args: InitDbArgs) -> Result<()> {
    let pool = create_pool(&args.db.database_url)
        .await
        .context("Failed to connect to database")?;

    schema::ensure_schema(&pool)
        .await
        .context("Failed to create schema")?;

    pool.close().await;
    Ok(())
}
