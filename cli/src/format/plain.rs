use crate::format::traits::BookmarkFormat;
use secondbrain::error::Result;
use secondbrain::{Bookmark, Collection};

/// Tab-separated, one record per line, for scripts
pub struct PlainBookmark<'a>(pub &'a Bookmark);

impl<'a> BookmarkFormat for PlainBookmark<'a> {
    fn render(&self) -> Result<String> {
        let b = self.0;
        Ok(format!(
            "{}\t{}\t{}\t{}\t{}",
            b.id,
            b.title,
            b.url,
            b.tags.join(","),
            sync_marker(b)
        ))
    }
}

pub struct PlainCollection<'a>(pub &'a Collection);

impl<'a> BookmarkFormat for PlainCollection<'a> {
    fn render(&self) -> Result<String> {
        let c = self.0;
        Ok(format!("{}\t{}\t{}", c.id, c.name, c.bookmark_count))
    }
}

/// `local`, `pending` or `synced`
pub fn sync_marker(bookmark: &Bookmark) -> &'static str {
    if bookmark.is_local_id {
        "local"
    } else if !bookmark.is_synced || bookmark.flags_diverged() {
        "pending"
    } else {
        "synced"
    }
}
