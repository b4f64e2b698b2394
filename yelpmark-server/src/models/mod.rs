//! Domain models with validation at construction
//!
//! Request input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod collection;
pub mod validation;
pub mod venue;

pub use collection::CollectionName;
pub use validation::ValidationError;
pub use venue::ExternalId;
