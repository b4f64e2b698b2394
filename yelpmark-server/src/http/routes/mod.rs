//! Route handlers organized by resource

pub mod bookmarks;
pub mod collections;
pub mod health;
pub mod search;
pub mod store;
