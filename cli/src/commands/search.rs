use super::{AppContext, BrainCommand};
use secondbrain::error::Result;

#[derive(Debug, Clone)]
pub struct SearchCommand {
    pub keywords: Vec<String>,
    pub limit: Option<usize>,
}

impl BrainCommand for SearchCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let query = self.keywords.join(" ");
        eprintln!("Searching for: {:?}", query);
        let mut records = ctx.service.search(&query)?;

        if records.is_empty() {
            eprintln!("No bookmarks found matching the search criteria.");
            return Ok(());
        }

        if let Some(limit) = self.limit {
            records.truncate(limit);
        }
        ctx.format.print_bookmarks(&records, ctx.no_color)
    }
}
