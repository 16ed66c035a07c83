use crate::models::{Bookmark, BookmarkId, CollectionId};
use serde::{Deserialize, Serialize};

/// A bookmark as the server returns it. Timestamps are epoch milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookmarkDto {
    pub id: BookmarkId,
    #[serde(default)]
    pub collection_id: Option<CollectionId>,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub favicon_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
    #[serde(default)]
    pub last_opened: Option<i64>,
    #[serde(default)]
    pub open_count: Option<i64>,
}

/// Body of create and update calls
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookmarkRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<CollectionId>,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub favicon_url: Option<String>,
    pub image_url: Option<String>,
    pub is_favorite: bool,
    pub is_archived: bool,
    pub last_opened: Option<i64>,
    pub open_count: i64,
}

impl From<&Bookmark> for BookmarkRequest {
    fn from(bookmark: &Bookmark) -> Self {
        Self {
            collection_id: bookmark.collection_id,
            title: bookmark.title.clone(),
            url: bookmark.url.clone(),
            description: bookmark.description.clone(),
            tags: bookmark.tags.clone(),
            favicon_url: bookmark.favicon_url.clone(),
            image_url: bookmark.image_url.clone(),
            is_favorite: bookmark.is_favorite,
            is_archived: bookmark.is_archived,
            last_opened: bookmark.last_opened,
            open_count: bookmark.open_count,
        }
    }
}
