//! Merge decisions between local records and server state.
//!
//! Everything here is a pure function over values; the repository performs
//! the I/O around it.

use crate::models::{Bookmark, BookmarkId, CollectionId};
use crate::remote::BookmarkDto;
use crate::store::BatchOp;
use crate::tags::normalize_tags;
use std::collections::{HashMap, HashSet};

/// A flag with a server shadow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Favorite,
    Archive,
}

impl Flag {
    pub const ALL: [Flag; 2] = [Flag::Favorite, Flag::Archive];

    pub fn local(self, bookmark: &Bookmark) -> bool {
        match self {
            Flag::Favorite => bookmark.is_favorite,
            Flag::Archive => bookmark.is_archived,
        }
    }

    pub fn diverged(self, bookmark: &Bookmark) -> bool {
        match self {
            Flag::Favorite => bookmark.favorite_diverged(),
            Flag::Archive => bookmark.archive_diverged(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Flag::Favorite => "favorite",
            Flag::Archive => "archive",
        }
    }
}

/// One flag to send to the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagPush {
    pub id: BookmarkId,
    pub flag: Flag,
    pub value: bool,
    /// `updated_at` of the record the value was read from
    pub seen_at: i64,
}

/// Push work for one collection, as disjoint sets
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PushPlan {
    /// Never reached the server; remote create
    pub creates: Vec<Bookmark>,
    /// Server records with unconfirmed content; remote update
    pub updates: Vec<Bookmark>,
    /// Tombstones with a server id; remote delete, then purge
    pub remote_deletes: Vec<BookmarkId>,
    /// Tombstones that never reached the server; purge only
    pub purges: Vec<BookmarkId>,
    pub flags: Vec<FlagPush>,
}

impl PushPlan {
    pub fn is_empty(&self) -> bool {
        self.creates.is_empty()
            && self.updates.is_empty()
            && self.remote_deletes.is_empty()
            && self.purges.is_empty()
            && self.flags.is_empty()
    }
}

/// Classify dirty records. Inputs are the store's unsynced, tombstoned and
/// flag-diverged queries; a record in an earlier set is dropped from later ones.
pub fn plan_push(unsynced: Vec<Bookmark>, deleted: Vec<Bookmark>, modified: Vec<Bookmark>) -> PushPlan {
    let mut plan = PushPlan::default();
    let mut covered = HashSet::new();

    for bookmark in deleted {
        covered.insert(bookmark.id);
        if bookmark.is_local_id {
            plan.purges.push(bookmark.id);
        } else {
            plan.remote_deletes.push(bookmark.id);
        }
    }

    for bookmark in unsynced {
        if !covered.insert(bookmark.id) {
            continue;
        }
        if bookmark.is_local_id {
            plan.creates.push(bookmark);
        } else {
            plan.updates.push(bookmark);
        }
    }

    for bookmark in modified {
        if bookmark.is_local_id || covered.contains(&bookmark.id) {
            continue;
        }
        for flag in Flag::ALL {
            if flag.diverged(&bookmark) {
                plan.flags.push(FlagPush {
                    id: bookmark.id,
                    flag,
                    value: flag.local(&bookmark),
                    seen_at: bookmark.updated_at,
                });
            }
        }
    }

    plan
}

/// Whether `current` still holds what was read from the store and sent.
/// Sync bookkeeping is ignored; any content or flag change counts.
pub fn unchanged_since(sent: &Bookmark, current: &Bookmark) -> bool {
    let comparable = Bookmark {
        server_is_favorite: sent.server_is_favorite,
        server_is_archived: sent.server_is_archived,
        is_synced: sent.is_synced,
        ..current.clone()
    };
    comparable == *sent
}

/// The record after the server accepted its creation. An edit made while
/// the request was in flight keeps its content and stays unsynced.
pub fn confirm_created(sent: &Bookmark, current: &Bookmark, remote: &BookmarkDto) -> Bookmark {
    if !unchanged_since(sent, current) {
        return Bookmark {
            id: remote.id,
            is_local_id: false,
            server_is_favorite: remote.is_favorite,
            server_is_archived: remote.is_archived,
            is_synced: false,
            ..current.clone()
        };
    }
    Bookmark {
        id: remote.id,
        is_local_id: false,
        is_favorite: remote.is_favorite,
        is_archived: remote.is_archived,
        server_is_favorite: remote.is_favorite,
        server_is_archived: remote.is_archived,
        is_synced: true,
        ..current.clone()
    }
}

/// The record after the server accepted a full update. Only the shadows move
/// when `current` was edited after `sent` was read.
pub fn confirm_updated(sent: &Bookmark, current: &Bookmark, remote: &BookmarkDto) -> Bookmark {
    Bookmark {
        server_is_favorite: remote.is_favorite,
        server_is_archived: remote.is_archived,
        is_synced: current.is_synced || unchanged_since(sent, current),
        ..current.clone()
    }
}

/// Set the shadow of `flag` to the value the server accepted
pub fn confirm_flag(local: &Bookmark, flag: Flag, value: bool) -> Bookmark {
    let mut confirmed = local.clone();
    match flag {
        Flag::Favorite => confirmed.server_is_favorite = value,
        Flag::Archive => confirmed.server_is_archived = value,
    }
    confirmed
}

/// A server record not yet known locally
pub fn bookmark_from_remote(remote: &BookmarkDto, collection_id: CollectionId, now: i64) -> Bookmark {
    let created_at = remote.created_at.unwrap_or(now);
    Bookmark {
        id: remote.id,
        is_local_id: false,
        collection_id: Some(collection_id),
        title: remote.title.clone(),
        url: remote.url.clone(),
        description: remote.description.clone(),
        tags: normalize_tags(&remote.tags),
        favicon_url: remote.favicon_url.clone(),
        image_url: remote.image_url.clone(),
        is_favorite: remote.is_favorite,
        is_archived: remote.is_archived,
        server_is_favorite: remote.is_favorite,
        server_is_archived: remote.is_archived,
        is_synced: true,
        is_deleted: false,
        created_at,
        updated_at: remote.updated_at.unwrap_or(created_at),
        last_opened: remote.last_opened,
        open_count: remote.open_count.unwrap_or(0),
    }
}

/// Overwrite server-owned fields of a local record. Open count, tags,
/// favicon, collection and creation time stay local.
pub fn merge_remote(local: &Bookmark, remote: &BookmarkDto) -> Bookmark {
    Bookmark {
        title: remote.title.clone(),
        url: remote.url.clone(),
        description: remote.description.clone(),
        image_url: remote.image_url.clone(),
        is_favorite: remote.is_favorite,
        is_archived: remote.is_archived,
        server_is_favorite: remote.is_favorite,
        server_is_archived: remote.is_archived,
        is_synced: true,
        updated_at: remote.updated_at.unwrap_or(local.updated_at),
        last_opened: remote.last_opened.or(local.last_opened),
        ..local.clone()
    }
}

/// Local writes that make a collection match the server
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PullPlan {
    pub inserts: Vec<Bookmark>,
    pub updates: Vec<Bookmark>,
    pub deletes: Vec<BookmarkId>,
}

impl PullPlan {
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }

    /// Upserts first, then deletes
    pub fn into_ops(self) -> Vec<BatchOp> {
        self.inserts
            .into_iter()
            .chain(self.updates)
            .map(BatchOp::Upsert)
            .chain(self.deletes.into_iter().map(BatchOp::Delete))
            .collect()
    }
}

/// Diff the full local state of a collection (tombstones included) against
/// the full remote list.
///
/// A local tombstone matching a remote record is left alone so its deletion
/// is still pushed. Only synced records can be removed as remotely deleted.
pub fn plan_pull(
    collection_id: CollectionId,
    local: &[Bookmark],
    remote: &[BookmarkDto],
    now: i64,
) -> PullPlan {
    let by_id: HashMap<BookmarkId, &Bookmark> = local.iter().map(|b| (b.id, b)).collect();
    let mut plan = PullPlan::default();

    for dto in remote {
        match by_id.get(&dto.id) {
            // Tombstones and unconfirmed edits wait for the next push
            Some(existing) if existing.is_deleted || !existing.is_synced => {}
            Some(existing) => {
                let merged = merge_remote(existing, dto);
                if &merged != *existing {
                    plan.updates.push(merged);
                }
            }
            None => plan.inserts.push(bookmark_from_remote(dto, collection_id, now)),
        }
    }

    let remote_ids: HashSet<BookmarkId> = remote.iter().map(|dto| dto.id).collect();
    plan.deletes = local
        .iter()
        .filter(|b| b.is_synced && !b.is_local_id && !remote_ids.contains(&b.id))
        .map(|b| b.id)
        .collect();

    plan
}
