use super::BookmarkRepository;
use crate::error::Result;
use crate::models::{Bookmark, CollectionId};
use crate::store::StoreChange;
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Snapshots of one collection's live bookmarks.
///
/// The first call to `next` yields the current contents at once; later calls
/// block until a committed store write changes them. An empty snapshot taken
/// while online starts a background refresh from the server.
pub struct BookmarkWatch {
    repo: BookmarkRepository,
    collection_id: CollectionId,
    changes: Receiver<StoreChange>,
    last: Option<Vec<Bookmark>>,
    refreshing: Arc<AtomicBool>,
}

impl BookmarkWatch {
    pub(crate) fn new(repo: BookmarkRepository, collection_id: CollectionId) -> Self {
        let changes = repo.store().subscribe();
        Self {
            repo,
            collection_id,
            changes,
            last: None,
            refreshing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn collection_id(&self) -> CollectionId {
        self.collection_id
    }

    /// Like `next`, but gives up after `timeout` without a new snapshot
    pub fn next_timeout(&mut self, timeout: Duration) -> Option<Result<Vec<Bookmark>>> {
        if self.last.is_none() {
            return Some(self.emit());
        }

        loop {
            match self.changes.recv_timeout(timeout) {
                Ok(_) => {
                    if let Some(snapshot) = self.changed_snapshot() {
                        return Some(snapshot);
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None
                }
            }
        }
    }

    fn emit(&mut self) -> Result<Vec<Bookmark>> {
        let snapshot = self.repo.store().list_by_collection(self.collection_id)?;
        if snapshot.is_empty() {
            self.start_refresh();
        }
        self.last = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// A new snapshot when the collection differs from the last one emitted
    fn changed_snapshot(&mut self) -> Option<Result<Vec<Bookmark>>> {
        while self.changes.try_recv().is_ok() {}

        let snapshot = match self.repo.store().list_by_collection(self.collection_id) {
            Ok(snapshot) => snapshot,
            Err(e) => return Some(Err(e)),
        };
        if self.last.as_ref() == Some(&snapshot) {
            return None;
        }
        if snapshot.is_empty() {
            self.start_refresh();
        }
        self.last = Some(snapshot.clone());
        Some(Ok(snapshot))
    }

    fn start_refresh(&self) {
        if !self.repo.is_online() || self.refreshing.swap(true, Ordering::SeqCst) {
            return;
        }

        let repo = self.repo.clone();
        let collection_id = self.collection_id;
        let refreshing = Arc::clone(&self.refreshing);
        let spawned = thread::Builder::new()
            .name(format!("refresh-{}", collection_id))
            .spawn(move || {
                debug!("Refreshing empty collection {}", collection_id);
                if let Err(e) = repo.refresh_bookmarks(collection_id) {
                    repo.report(&format!("Refresh of collection {} failed", collection_id), &e);
                }
                refreshing.store(false, Ordering::SeqCst);
            });

        if let Err(e) = spawned {
            self.repo.report("Cannot start refresh thread", &e);
            self.refreshing.store(false, Ordering::SeqCst);
        }
    }
}

impl Iterator for BookmarkWatch {
    type Item = Result<Vec<Bookmark>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.last.is_none() {
            return Some(self.emit());
        }

        loop {
            self.changes.recv().ok()?;
            if let Some(snapshot) = self.changed_snapshot() {
                return Some(snapshot);
            }
        }
    }
}
