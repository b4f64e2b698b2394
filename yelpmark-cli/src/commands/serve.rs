//! HTTP server command
//!
//! Runs the yelpmark API with the store pool and the Yelp directory client.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use yelpmark_server::db::{create_pool_with_options, pool::DEFAULT_MAX_CONNECTIONS};
use yelpmark_server::directory::DEFAULT_API_HOST;
use yelpmark_server::{
    run_server, AppState, DirectoryConfig, ServerConfig, TimestampPolicy, YelpClient,
};

use super::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "BIND_ADDR", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = 8001)]
    pub port: u16,

    #[command(flatten)]
    pub db: DatabaseArgs,

    /// Maximum pooled database connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Offset naive store timestamps were written in (`utc`, `+02:00`, ...)
    #[arg(long, env = "DB_TIMESTAMP_OFFSET", default_value = "utc")]
    pub db_timestamp_offset: TimestampPolicy,

    /// Single origin allowed by CORS (no CORS headers when unset)
    #[arg(long, env = "CORS_ALLOW_ORIGIN")]
    pub cors_allow_origin: Option<String>,

    /// Yelp API base URL
    #[arg(long, env = "YELP_API_HOST", default_value = DEFAULT_API_HOST)]
    pub yelp_api_host: String,

    /// Yelp API key
    #[arg(long, env = "YELP_API_KEY", hide_env_values = true)]
    pub yelp_api_key: String,

    /// Per-request Yelp timeout in seconds (default: wait indefinitely)
    #[arg(long, env = "YELP_TIMEOUT_SECS")]
    pub yelp_timeout_secs: Option<u64>,
}

/// Run the HTTP server until shutdown
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let bind_addr = SocketAddr::new(args.bind, args.port);
    tracing::info!("Starting yelpmark server on {}", bind_addr);

    let pool = create_pool_with_options(&args.db.database_url, args.max_connections)
        .await
        .context("Failed to create database pool")?;

    let directory = YelpClient::new(DirectoryConfig {
        base_url: args.yelp_api_host,
        api_key: args.yelp_api_key,
        timeout: args.yelp_timeout_secs.map(Duration::from_secs),
    })
    .context("Failed to build Yelp client")?;

    let state = AppState::new(pool, Arc::new(directory)).with_timestamps(args.db_timestamp_offset);
    let config = ServerConfig {
        bind_addr,
        cors_allow_origin: args.cors_allow_origin,
    };

    run_server(state, config).await.context("Server error")?;

    Ok(())
}
