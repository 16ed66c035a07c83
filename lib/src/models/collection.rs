use super::bookmark::CollectionId;
use serde::{Deserialize, Serialize};

pub const DEFAULT_COLOR: &str = "#6366F1";

/// A local grouping of bookmarks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    /// Non-deleted bookmarks currently in the collection
    pub bookmark_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}
