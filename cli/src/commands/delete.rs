use super::helpers::confirm;
use super::{AppContext, BrainCommand};
use secondbrain::error::Result;
use secondbrain::BookmarkId;

#[derive(Debug, Clone)]
pub struct DeleteCommand {
    pub ids: Vec<BookmarkId>,
    pub force: bool,
}

impl BrainCommand for DeleteCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let mut found = Vec::new();
        for &id in &self.ids {
            match ctx.service.repository().get_by_id(id)? {
                Some(bookmark) => found.push(bookmark),
                None => eprintln!("Bookmark {} not found", id),
            }
        }

        if found.is_empty() {
            eprintln!("No bookmarks to delete.");
            return Ok(());
        }

        eprintln!("Bookmarks to be deleted:");
        for bookmark in &found {
            eprintln!("  {}. {} - {}", bookmark.id, bookmark.title, bookmark.url);
        }

        let confirmed = self.force || confirm(&format!("\nDelete {} bookmark(s)?", found.len()))?;
        if !confirmed {
            eprintln!("Deletion cancelled.");
            return Ok(());
        }

        let ids: Vec<BookmarkId> = found.iter().map(|b| b.id).collect();
        let removed = ctx.service.delete_bookmarks(&ids)?;
        eprintln!("Deleted {} bookmark(s).", removed);
        Ok(())
    }
}
