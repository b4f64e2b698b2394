//! yelpmark CLI - runs the bookmark/collection API backed by PostgreSQL and Yelp
//!
//! Subcommands:
//! - `serve`: run the HTTP API
//! - `init-db`: create the store schema

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "yelpmark",
    author,
    version,
    about = "Bookmark Yelp businesses into collections",
    long_about = "HTTP backend that stores bookmarks and collections in PostgreSQL \
                  and proxies the Yelp business directory for the front end."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces via OpenTelemetry OTLP (needs the `telemetry` feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::ServeArgs),
    /// Create the database schema (safe to re-run)
    InitDb(commands::InitDbArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables win
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })?;

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await,
        Commands::InitDb(args) => commands::run_init_db(args).await,
    };

    tracing_setup::shutdown_otel();
    result
}
