use super::{AppContext, BrainCommand};
use secondbrain::browser;
use secondbrain::error::Result;
use secondbrain::BookmarkId;

#[derive(Debug, Clone)]
pub struct OpenCommand {
    pub ids: Vec<BookmarkId>,
}

impl BrainCommand for OpenCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        for &id in &self.ids {
            let bookmark = ctx.service.mark_opened(id)?;
            eprintln!("Opening: {}", bookmark.url);
            browser::open_url(&bookmark.url)?;
        }
        Ok(())
    }
}
