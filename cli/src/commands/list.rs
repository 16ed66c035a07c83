use super::{AppContext, BrainCommand};
use log::debug;
use secondbrain::error::Result;
use secondbrain::{Bookmark, CollectionId};

#[derive(Debug, Clone, Default)]
pub struct ListCommand {
    pub collection: Option<CollectionId>,
    pub favorites: bool,
    pub archived: bool,
    /// Show only the newest N
    pub limit: Option<usize>,
}

impl ListCommand {
    fn records(&self, ctx: &AppContext) -> Result<Vec<Bookmark>> {
        let repo = ctx.service.repository();
        if self.favorites {
            return repo.list_favorites();
        }
        if self.archived {
            return repo.list_archived();
        }
        match self.collection.or(ctx.config.default_collection) {
            Some(collection_id) => self.watch_collection(ctx, collection_id),
            None => repo.list_all(),
        }
    }

    /// An empty collection is filled from the server when online
    fn watch_collection(&self, ctx: &AppContext, collection_id: CollectionId) -> Result<Vec<Bookmark>> {
        let repo = ctx.service.repository();
        let mut watch = repo.observe(collection_id);
        let first = match watch.next() {
            Some(snapshot) => snapshot?,
            None => return Ok(Vec::new()),
        };
        if !first.is_empty() || !repo.is_online() {
            return Ok(first);
        }

        debug!("Collection {} empty locally, waiting for refresh", collection_id);
        match watch.next_timeout(ctx.config.request_timeout()) {
            Some(snapshot) => snapshot,
            None => Ok(first),
        }
    }
}

impl BrainCommand for ListCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let mut records = self.records(ctx)?;
        if records.is_empty() {
            eprintln!("No bookmarks found.");
            return Ok(());
        }

        if let Some(limit) = self.limit {
            records.truncate(limit);
        }
        ctx.format.print_bookmarks(&records, ctx.no_color)
    }
}
