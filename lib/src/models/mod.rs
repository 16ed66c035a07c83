pub mod bookmark;
pub mod collection;

pub use bookmark::{Bookmark, BookmarkId, CollectionId};
pub use collection::Collection;
