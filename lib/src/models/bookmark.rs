use crate::tags::normalize_tags;
use serde::{Deserialize, Serialize};

/// Local ids are negative, server ids positive.
pub type BookmarkId = i64;
pub type CollectionId = i64;

/// A bookmark as held in the local store, including its sync bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bookmark {
    pub id: BookmarkId,
    /// True until the server has confirmed creation of this record
    pub is_local_id: bool,
    pub collection_id: Option<CollectionId>,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub favicon_url: Option<String>,
    pub image_url: Option<String>,
    pub is_favorite: bool,
    pub is_archived: bool,
    /// Favorite flag as last confirmed by the server
    pub server_is_favorite: bool,
    /// Archive flag as last confirmed by the server
    pub server_is_archived: bool,
    pub is_synced: bool,
    pub is_deleted: bool,
    /// Unix epoch milliseconds
    pub created_at: i64,
    pub updated_at: i64,
    pub last_opened: Option<i64>,
    pub open_count: i64,
}

impl Bookmark {
    /// A fresh, never-synced record. The store assigns the local id on insert.
    pub fn draft(collection_id: Option<CollectionId>, title: &str, url: &str, now: i64) -> Self {
        Self {
            id: 0,
            is_local_id: true,
            collection_id,
            title: title.to_string(),
            url: url.to_string(),
            description: None,
            tags: Vec::new(),
            favicon_url: None,
            image_url: None,
            is_favorite: false,
            is_archived: false,
            server_is_favorite: false,
            server_is_archived: false,
            is_synced: false,
            is_deleted: false,
            created_at: now,
            updated_at: now,
            last_opened: None,
            open_count: 0,
        }
    }

    pub fn with_description(mut self, description: Option<&str>) -> Self {
        self.description = description.map(str::to_string);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = normalize_tags(tags);
        self
    }

    pub fn favorite_diverged(&self) -> bool {
        self.is_favorite != self.server_is_favorite
    }

    pub fn archive_diverged(&self) -> bool {
        self.is_archived != self.server_is_archived
    }

    /// Any flag differs from what the server last confirmed
    pub fn flags_diverged(&self) -> bool {
        self.favorite_diverged() || self.archive_diverged()
    }

    /// Host part of the URL, without a leading `www.`
    pub fn domain(&self) -> String {
        reqwest::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.strip_prefix("www.").unwrap_or(h).to_string()))
            .unwrap_or_default()
    }
}
