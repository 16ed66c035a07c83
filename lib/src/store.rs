//! The local store boundary used by the reconciler.

use crate::error::Result;
use crate::models::{Bookmark, BookmarkId, CollectionId};
use std::sync::mpsc::Receiver;

/// Emitted after every committed write that touched at least one bookmark
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    pub ids: Vec<BookmarkId>,
}

/// One step of an atomic batch
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOp {
    /// Insert or replace by id
    Upsert(Bookmark),
    Delete(BookmarkId),
}

/// Persistent bookmark table.
///
/// Every method is atomic on its own; `apply_batch` is the only way to make
/// several writes atomic together. List queries never return tombstoned
/// (`is_deleted`) rows unless their name says otherwise.
pub trait BookmarkStore: Send + Sync {
    /// Point read, tombstones included
    fn get_by_id(&self, id: BookmarkId) -> Result<Option<Bookmark>>;

    /// Insert a record. A record flagged `is_local_id` receives a freshly
    /// allocated local id; otherwise its own id is used (replacing any row
    /// with that id). Returns the id the row was written under.
    fn insert(&self, bookmark: &Bookmark) -> Result<BookmarkId>;

    /// Upsert by id in one transaction
    fn insert_batch(&self, bookmarks: &[Bookmark]) -> Result<()>;

    /// Overwrite an existing row; `BookmarkNotFound` when absent
    fn update(&self, bookmark: &Bookmark) -> Result<()>;

    /// Hard delete. Returns whether a row was removed.
    fn delete_by_id(&self, id: BookmarkId) -> Result<bool>;

    fn delete_batch(&self, ids: &[BookmarkId]) -> Result<usize>;

    fn list_by_collection(&self, collection_id: CollectionId) -> Result<Vec<Bookmark>>;
    fn list_all(&self) -> Result<Vec<Bookmark>>;
    fn list_favorites(&self) -> Result<Vec<Bookmark>>;
    fn list_archived(&self) -> Result<Vec<Bookmark>>;

    /// Case-insensitive substring match on title, description, url and tags
    fn search(&self, text: &str) -> Result<Vec<Bookmark>>;

    /// Exact tag match
    fn list_by_tag(&self, tag: &str) -> Result<Vec<Bookmark>>;

    /// `!is_synced && !is_deleted` within the collection
    fn list_unsynced(&self, collection_id: CollectionId) -> Result<Vec<Bookmark>>;

    /// Tombstones within the collection
    fn list_deleted(&self, collection_id: CollectionId) -> Result<Vec<Bookmark>>;

    /// Non-deleted records whose flags differ from their server shadows
    fn list_modified(&self, collection_id: CollectionId) -> Result<Vec<Bookmark>>;

    /// Every row of the collection, tombstones included
    fn list_collection_state(&self, collection_id: CollectionId) -> Result<Vec<Bookmark>>;

    /// Renumber a row in place and clear its `is_local_id` flag. Every other
    /// column, the collection association included, is kept.
    fn update_local_id(&self, old_id: BookmarkId, new_id: BookmarkId) -> Result<()>;

    /// Returns the number of non-deleted rows changed
    fn set_favorite(&self, ids: &[BookmarkId], value: bool, now: i64) -> Result<usize>;

    fn set_archived(&self, ids: &[BookmarkId], value: bool, now: i64) -> Result<usize>;

    /// Soft delete
    fn mark_deleted(&self, ids: &[BookmarkId], now: i64) -> Result<usize>;

    /// Stamp `last_opened`, bump `open_count`, clear `is_synced`
    fn record_open(&self, id: BookmarkId, now: i64) -> Result<()>;

    /// Apply every op in order inside one transaction
    fn apply_batch(&self, ops: &[BatchOp]) -> Result<()>;

    /// Change feed; the receiver sees every write committed after this call
    fn subscribe(&self) -> Receiver<StoreChange>;
}
