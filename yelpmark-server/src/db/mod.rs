//! Store layer - connection pool, schema bootstrap and repositories
//!
//! # Design Principles
//!
//! - One pooled connection per request, returned when the guard drops
//! - Repositories borrow that connection; they never acquire their own
//! - Rely on DB constraints, handle conflicts - no blind check-then-insert
//! - `timestamp` columns are read and written through an explicit [`TimestampPolicy`]

pub mod error;
pub mod pool;
pub mod repos;
pub mod schema;
pub mod session;
pub mod timestamp;

pub use error::{Severity, StoreError};
pub use pool::{acquire, create_pool, create_pool_with_options, ping};
pub use repos::*;
pub use session::PgSession;
pub use timestamp::TimestampPolicy;
