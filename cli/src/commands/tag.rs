use super::{AppContext, BrainCommand};
use secondbrain::error::Result;

#[derive(Debug, Clone)]
pub struct TagCommand {
    pub tag: String,
}

impl BrainCommand for TagCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let records = ctx.service.bookmarks_by_tag(&self.tag)?;
        if records.is_empty() {
            eprintln!("No bookmarks tagged '{}'.", self.tag.trim());
            return Ok(());
        }
        ctx.format.print_bookmarks(&records, ctx.no_color)
    }
}
