pub mod browser;
pub mod config;
pub mod connectivity;
pub mod db;
pub mod diagnostics;
pub mod error;
pub mod models;
pub mod remote;
pub mod service;
pub mod store;
pub mod sync;
pub mod tags;
pub mod utils;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

// Re-export the types most callers need
pub use error::{Result, SecondBrainError};
pub use models::{Bookmark, BookmarkId, Collection, CollectionId};
pub use sync::{BookmarkRepository, BookmarkWatch, SyncReport};
