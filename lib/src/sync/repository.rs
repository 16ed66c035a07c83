use super::reconcile::{self, Flag, FlagPush, PullPlan};
use super::watch::BookmarkWatch;
use super::{PullSummary, SyncReport};
use crate::connectivity::ConnectivityOracle;
use crate::diagnostics::{ErrorSink, LogSink};
use crate::error::{Result, SecondBrainError};
use crate::models::{Bookmark, BookmarkId, CollectionId};
use crate::remote::{BookmarkDto, BookmarkRequest, RemoteError, RemoteService};
use crate::store::{BatchOp, BookmarkStore};
use crate::utils::now_millis;
use log::{debug, info};
use std::sync::Arc;

/// Offline-first bookmark access.
///
/// Every mutation lands in the local store first and succeeds once it has.
/// When the device is online the matching remote call follows; its failure
/// goes to the error sink and never to the caller.
#[derive(Clone)]
pub struct BookmarkRepository {
    store: Arc<dyn BookmarkStore>,
    remote: Arc<dyn RemoteService>,
    connectivity: Arc<dyn ConnectivityOracle>,
    errors: Arc<dyn ErrorSink>,
}

/// Result of one push attempt
enum Pushed {
    Confirmed(BookmarkId),
    Failed,
}

impl BookmarkRepository {
    pub fn new(
        store: Arc<dyn BookmarkStore>,
        remote: Arc<dyn RemoteService>,
        connectivity: Arc<dyn ConnectivityOracle>,
    ) -> Self {
        Self {
            store,
            remote,
            connectivity,
            errors: Arc::new(LogSink),
        }
    }

    pub fn with_error_sink(mut self, errors: Arc<dyn ErrorSink>) -> Self {
        self.errors = errors;
        self
    }

    pub fn is_online(&self) -> bool {
        self.connectivity.is_online()
    }

    pub(crate) fn store(&self) -> &dyn BookmarkStore {
        self.store.as_ref()
    }

    pub(crate) fn report(&self, context: &str, error: &dyn std::error::Error) {
        self.errors.record(context, error);
    }

    fn live(&self, id: BookmarkId) -> Result<Bookmark> {
        self.store
            .get_by_id(id)?
            .filter(|b| !b.is_deleted)
            .ok_or(SecondBrainError::BookmarkNotFound(id))
    }

    // Mutations

    /// Store a new bookmark and try to create it on the server.
    /// Returns the id it lives under afterwards: the server id when creation
    /// was confirmed, a local (negative) id otherwise.
    pub fn insert(&self, bookmark: &Bookmark) -> Result<BookmarkId> {
        let record = Bookmark {
            is_local_id: true,
            is_synced: false,
            is_deleted: false,
            server_is_favorite: false,
            server_is_archived: false,
            ..bookmark.clone()
        };
        let local_id = self.store.insert(&record)?;
        debug!("Stored bookmark {} under local id {}", record.url, local_id);

        if !self.is_online() {
            return Ok(local_id);
        }
        match self.push_created(local_id)? {
            Pushed::Confirmed(id) => Ok(id),
            Pushed::Failed => Ok(local_id),
        }
    }

    /// Replace the content of an existing bookmark. Sync bookkeeping is
    /// kept from the stored row.
    pub fn update(&self, bookmark: &Bookmark) -> Result<()> {
        let existing = self.live(bookmark.id)?;
        let record = Bookmark {
            is_local_id: existing.is_local_id,
            server_is_favorite: existing.server_is_favorite,
            server_is_archived: existing.server_is_archived,
            is_synced: false,
            is_deleted: false,
            updated_at: now_millis(),
            ..bookmark.clone()
        };
        self.store.update(&record)?;

        if self.is_online() {
            let stored = self.live(record.id)?;
            self.push_content(&stored)?;
        }
        Ok(())
    }

    /// Records that never reached the server are purged at once. Others are
    /// tombstoned and purged when the server confirms the delete.
    pub fn delete(&self, id: BookmarkId) -> Result<()> {
        let existing = self.live(id)?;
        if existing.is_local_id {
            self.store.delete_by_id(id)?;
            return Ok(());
        }

        self.store.mark_deleted(&[id], now_millis())?;
        if self.is_online() {
            self.push_delete(id)?;
        }
        Ok(())
    }

    /// Flip the favorite flag; returns the new value
    pub fn toggle_favorite(&self, id: BookmarkId) -> Result<bool> {
        self.toggle(id, Flag::Favorite)
    }

    /// Flip the archive flag; returns the new value
    pub fn toggle_archive(&self, id: BookmarkId) -> Result<bool> {
        self.toggle(id, Flag::Archive)
    }

    fn toggle(&self, id: BookmarkId, flag: Flag) -> Result<bool> {
        let existing = self.live(id)?;
        let value = !flag.local(&existing);
        self.set_flag_local(&[id], flag, value)?;

        if self.is_online() && !existing.is_local_id {
            let seen_at = existing.updated_at;
            self.push_flag(FlagPush { id, flag, value, seen_at }, false)?;
        }
        Ok(value)
    }

    fn set_flag_local(&self, ids: &[BookmarkId], flag: Flag, value: bool) -> Result<usize> {
        let now = now_millis();
        match flag {
            Flag::Favorite => self.store.set_favorite(ids, value, now),
            Flag::Archive => self.store.set_archived(ids, value, now),
        }
    }

    /// Stamp the bookmark as opened now
    pub fn update_last_opened(&self, id: BookmarkId) -> Result<()> {
        self.store.record_open(id, now_millis())?;

        if self.is_online() {
            let record = self.live(id)?;
            self.push_content(&record)?;
        }
        Ok(())
    }

    /// Bulk delete in one local transaction; returns how many bookmarks were
    /// removed. Missing or already deleted ids are skipped.
    pub fn delete_many(&self, ids: &[BookmarkId]) -> Result<usize> {
        let now = now_millis();
        let mut ops = Vec::new();
        let mut server_ids = Vec::new();

        for &id in ids {
            let Some(existing) = self.store.get_by_id(id)?.filter(|b| !b.is_deleted) else {
                continue;
            };
            if existing.is_local_id {
                ops.push(BatchOp::Delete(id));
            } else {
                server_ids.push(id);
                ops.push(BatchOp::Upsert(Bookmark {
                    is_deleted: true,
                    updated_at: now,
                    ..existing
                }));
            }
        }
        self.store.apply_batch(&ops)?;

        if self.is_online() {
            for id in server_ids {
                self.push_delete(id)?;
            }
        }
        Ok(ops.len())
    }

    pub fn set_favorite_many(&self, ids: &[BookmarkId], value: bool) -> Result<usize> {
        self.set_flag_many(ids, Flag::Favorite, value)
    }

    pub fn set_archived_many(&self, ids: &[BookmarkId], value: bool) -> Result<usize> {
        self.set_flag_many(ids, Flag::Archive, value)
    }

    fn set_flag_many(&self, ids: &[BookmarkId], flag: Flag, value: bool) -> Result<usize> {
        let changed = self.set_flag_local(ids, flag, value)?;

        if self.is_online() {
            for &id in ids {
                match self.store.get_by_id(id)? {
                    Some(b) if !b.is_deleted && !b.is_local_id => {
                        let seen_at = b.updated_at;
                        self.push_flag(FlagPush { id, flag, value, seen_at }, false)?;
                    }
                    _ => {}
                }
            }
        }
        Ok(changed)
    }

    // Reads

    /// Live snapshots of a collection, refreshed from the server while empty
    pub fn observe(&self, collection_id: CollectionId) -> BookmarkWatch {
        BookmarkWatch::new(self.clone(), collection_id)
    }

    /// Tombstoned records read as absent
    pub fn get_by_id(&self, id: BookmarkId) -> Result<Option<Bookmark>> {
        Ok(self.store.get_by_id(id)?.filter(|b| !b.is_deleted))
    }

    pub fn list_by_collection(&self, collection_id: CollectionId) -> Result<Vec<Bookmark>> {
        self.store.list_by_collection(collection_id)
    }

    pub fn list_all(&self) -> Result<Vec<Bookmark>> {
        self.store.list_all()
    }

    pub fn list_favorites(&self) -> Result<Vec<Bookmark>> {
        self.store.list_favorites()
    }

    pub fn list_archived(&self) -> Result<Vec<Bookmark>> {
        self.store.list_archived()
    }

    pub fn search(&self, text: &str) -> Result<Vec<Bookmark>> {
        self.store.search(text)
    }

    pub fn list_by_tag(&self, tag: &str) -> Result<Vec<Bookmark>> {
        self.store.list_by_tag(tag)
    }

    // Sync

    /// Replace the local view of a collection with the server's.
    /// Offline this does nothing; a failing remote list is an error.
    pub fn refresh_bookmarks(&self, collection_id: CollectionId) -> Result<PullSummary> {
        if !self.is_online() {
            return Ok(PullSummary::default());
        }

        let remote = self.remote.list(collection_id)?;
        let local = self.store.list_collection_state(collection_id)?;
        let plan = reconcile::plan_pull(collection_id, &local, &remote, now_millis());
        let summary = PullSummary::from(&plan);

        if !plan.is_empty() {
            self.store.apply_batch(&plan.into_ops())?;
        }
        debug!("Pulled collection {}: {:?}", collection_id, summary);
        Ok(summary)
    }

    /// Push every pending local change of a collection, then pull the server
    /// state. Push failures are isolated per record and per flag.
    pub fn sync_bookmarks(&self, collection_id: CollectionId) -> Result<SyncReport> {
        if !self.is_online() {
            debug!("Offline, skipping sync of collection {}", collection_id);
            return Ok(SyncReport::offline());
        }

        let plan = reconcile::plan_push(
            self.store.list_unsynced(collection_id)?,
            self.store.list_deleted(collection_id)?,
            self.store.list_modified(collection_id)?,
        );
        let mut report = SyncReport::online();

        for bookmark in &plan.creates {
            match self.push_created(bookmark.id)? {
                Pushed::Confirmed(_) => report.created += 1,
                Pushed::Failed => report.failures += 1,
            }
        }

        for bookmark in &plan.updates {
            match self.push_updated(bookmark)? {
                Pushed::Confirmed(_) => report.updated += 1,
                Pushed::Failed => report.failures += 1,
            }
        }

        for &id in &plan.remote_deletes {
            if let Err(e) = self.remote.delete(id) {
                if !is_not_found(&e) {
                    self.report(&format!("Remote delete of bookmark {} failed", id), &e);
                    report.failures += 1;
                }
            }
            self.store.delete_by_id(id)?;
            report.deleted += 1;
        }

        if !plan.purges.is_empty() {
            report.deleted += self.store.delete_batch(&plan.purges)?;
        }

        for push in &plan.flags {
            if self.push_flag(*push, true)? {
                report.flags_pushed += 1;
            } else {
                report.failures += 1;
            }
        }

        report.pulled = self.refresh_bookmarks(collection_id)?;
        info!("Synced collection {}: {}", collection_id, report);
        Ok(report)
    }

    // Remote confirmation

    fn push_content(&self, record: &Bookmark) -> Result<()> {
        if record.is_local_id {
            self.push_created(record.id)?;
        } else {
            self.push_updated(record)?;
        }
        Ok(())
    }

    /// Create the record remotely and renumber it under the server id
    fn push_created(&self, local_id: BookmarkId) -> Result<Pushed> {
        let Some(record) = self.store.get_by_id(local_id)? else {
            return Ok(Pushed::Failed);
        };

        let dto = match self.remote.create(&BookmarkRequest::from(&record)) {
            Ok(dto) => dto,
            Err(e) => {
                self.report(&format!("Remote create of bookmark {} failed", local_id), &e);
                return Ok(Pushed::Failed);
            }
        };

        self.adopt_server_id(&record, &dto)?;
        debug!("Bookmark {} confirmed as {}", local_id, dto.id);
        Ok(Pushed::Confirmed(dto.id))
    }

    /// Renumber and confirm in one transaction. A row already stored under
    /// the server id, brought in by a pull, is replaced.
    fn adopt_server_id(&self, sent: &Bookmark, dto: &BookmarkDto) -> Result<()> {
        let Some(current) = self.store.get_by_id(sent.id)? else {
            return Ok(());
        };
        let confirmed = reconcile::confirm_created(sent, &current, dto);
        self.store
            .apply_batch(&[BatchOp::Delete(sent.id), BatchOp::Upsert(confirmed)])
    }

    fn push_updated(&self, record: &Bookmark) -> Result<Pushed> {
        let dto = match self.remote.update(record.id, &BookmarkRequest::from(record)) {
            Ok(dto) => dto,
            Err(e) => {
                self.report(&format!("Remote update of bookmark {} failed", record.id), &e);
                return Ok(Pushed::Failed);
            }
        };

        if let Some(current) = self.store.get_by_id(record.id)? {
            self.store
                .update(&reconcile::confirm_updated(record, &current, &dto))?;
        }
        Ok(Pushed::Confirmed(record.id))
    }

    /// Returns whether the server accepted the delete; the row is purged if so
    fn push_delete(&self, id: BookmarkId) -> Result<bool> {
        match self.remote.delete(id) {
            Ok(()) => {}
            Err(e) if is_not_found(&e) => {}
            Err(e) => {
                self.report(&format!("Remote delete of bookmark {} failed", id), &e);
                return Ok(false);
            }
        }
        self.store.delete_by_id(id)?;
        Ok(true)
    }

    /// Send one flag. On success its shadow takes the sent value; a sync
    /// pass also marks the record synced unless it changed since planning.
    fn push_flag(&self, push: FlagPush, mark_synced: bool) -> Result<bool> {
        let FlagPush { id, flag, value, seen_at } = push;
        let result = match flag {
            Flag::Favorite => self.remote.update_favorite(id, value),
            Flag::Archive => self.remote.update_archive(id, value),
        };
        if let Err(e) = result {
            self.report(&format!("Remote {} update of bookmark {} failed", flag.name(), id), &e);
            return Ok(false);
        }

        if let Some(current) = self.store.get_by_id(id)? {
            let mut confirmed = reconcile::confirm_flag(&current, flag, value);
            if mark_synced && current.updated_at == seen_at {
                confirmed.is_synced = true;
            }
            self.store.update(&confirmed)?;
        }
        Ok(true)
    }
}

fn is_not_found(error: &RemoteError) -> bool {
    error.status() == Some(404)
}

impl From<&PullPlan> for PullSummary {
    fn from(plan: &PullPlan) -> Self {
        Self {
            inserted: plan.inserts.len(),
            updated: plan.updates.len(),
            removed: plan.deletes.len(),
        }
    }
}
