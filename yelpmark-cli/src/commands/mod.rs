//! Command implementations for the yelpmark CLI

pub mod init_db;
pub mod serve;

use clap::Args;

pub use init_db::{run_init_db, InitDbArgs};
pub use serve::{run_serve, ServeArgs};

/// Default database URL when neither flag nor DATABASE_URL is given
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/elm-yelp-app";

/// Database connection arguments shared by all commands
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,
}
