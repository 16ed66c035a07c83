//! Validated entry points over the repository.
//!
//! Input is sanitized and checked before anything touches the store; a
//! rejected request performs no mutation.

use crate::error::{Result, SecondBrainError};
use crate::models::{Bookmark, BookmarkId, CollectionId};
use crate::sync::{BookmarkRepository, SyncReport};
use crate::utils::now_millis;
use crate::validation::{self, ensure_valid};
use log::info;

#[derive(Clone)]
pub struct BookmarkService {
    repo: BookmarkRepository,
}

/// Fields of a new bookmark
#[derive(Debug, Clone, Default)]
pub struct NewBookmark {
    pub collection_id: CollectionId,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

impl BookmarkService {
    pub fn new(repo: BookmarkRepository) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &BookmarkRepository {
        &self.repo
    }

    /// Create a bookmark and return it as stored
    pub fn create_bookmark(&self, input: &NewBookmark) -> Result<Bookmark> {
        let clean = validation::sanitize(
            &input.title,
            &input.url,
            input.description.as_deref(),
            &input.tags,
        );
        ensure_valid(validation::validate_for_creation(
            input.collection_id,
            &clean.title,
            &clean.url,
            clean.description.as_deref(),
            &clean.tags,
        ))?;

        let draft = Bookmark::draft(Some(input.collection_id), &clean.title, &clean.url, now_millis())
            .with_description(clean.description.as_deref())
            .with_tags(&clean.tags);
        let id = self.repo.insert(&draft)?;
        info!("Added bookmark {} ({})", id, clean.url);
        self.get_bookmark(id)
    }

    pub fn update_bookmark(&self, bookmark: &Bookmark) -> Result<()> {
        let clean = validation::sanitize(
            &bookmark.title,
            &bookmark.url,
            bookmark.description.as_deref(),
            &bookmark.tags,
        );
        let updated = Bookmark {
            title: clean.title,
            url: clean.url,
            description: clean.description,
            tags: clean.tags,
            ..bookmark.clone()
        };
        ensure_valid(validation::validate_for_update(&updated))?;
        self.repo.update(&updated)
    }

    pub fn get_bookmark(&self, id: BookmarkId) -> Result<Bookmark> {
        ensure_valid(validation::validate_bookmark_id(id))?;
        self.repo
            .get_by_id(id)?
            .ok_or(SecondBrainError::BookmarkNotFound(id))
    }

    pub fn delete_bookmark(&self, id: BookmarkId) -> Result<()> {
        ensure_valid(validation::validate_bookmark_id(id))?;
        self.repo.delete(id)
    }

    pub fn delete_bookmarks(&self, ids: &[BookmarkId]) -> Result<usize> {
        ensure_valid(validation::validate_bookmark_ids(ids))?;
        self.repo.delete_many(ids)
    }

    pub fn toggle_favorite(&self, id: BookmarkId) -> Result<bool> {
        ensure_valid(validation::validate_bookmark_id(id))?;
        self.repo.toggle_favorite(id)
    }

    pub fn toggle_archive(&self, id: BookmarkId) -> Result<bool> {
        ensure_valid(validation::validate_bookmark_id(id))?;
        self.repo.toggle_archive(id)
    }

    pub fn set_favorite(&self, ids: &[BookmarkId], value: bool) -> Result<usize> {
        ensure_valid(validation::validate_bookmark_ids(ids))?;
        self.repo.set_favorite_many(ids, value)
    }

    pub fn set_archived(&self, ids: &[BookmarkId], value: bool) -> Result<usize> {
        ensure_valid(validation::validate_bookmark_ids(ids))?;
        self.repo.set_archived_many(ids, value)
    }

    /// Record an open and return the bookmark to launch
    pub fn mark_opened(&self, id: BookmarkId) -> Result<Bookmark> {
        ensure_valid(validation::validate_bookmark_id(id))?;
        self.repo.update_last_opened(id)?;
        self.get_bookmark(id)
    }

    pub fn collection_bookmarks(&self, collection_id: CollectionId) -> Result<Vec<Bookmark>> {
        ensure_valid(validation::validate_collection_id(collection_id))?;
        self.repo.list_by_collection(collection_id)
    }

    /// A blank query lists everything
    pub fn search(&self, query: &str) -> Result<Vec<Bookmark>> {
        ensure_valid(validation::validate_search_query(query))?;
        self.repo.search(query)
    }

    pub fn bookmarks_by_tag(&self, tag: &str) -> Result<Vec<Bookmark>> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(SecondBrainError::InvalidInput("tag must not be blank".to_string()));
        }
        self.repo.list_by_tag(tag)
    }

    pub fn sync(&self, collection_id: CollectionId) -> Result<SyncReport> {
        ensure_valid(validation::validate_collection_id(collection_id))?;
        self.repo.sync_bookmarks(collection_id)
    }
}
