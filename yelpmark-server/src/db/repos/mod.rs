//! Repository implementations for store access
//!
//! Each repository borrows one checked-out connection and the
//! [`TimestampPolicy`](super::TimestampPolicy) used to map its rows.

pub mod bookmarks;
pub mod collections;
pub mod venues;

pub use bookmarks::{Bookmark, BookmarkRepo};
pub use collections::{Collection, CollectionRepo};
pub use venues::{Venue, VenueRepo};
