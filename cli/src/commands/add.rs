use super::helpers::{collect_tags, report_sync_state, resolve_collection};
use super::{AppContext, BrainCommand};
use secondbrain::error::Result;
use secondbrain::service::NewBookmark;
use secondbrain::CollectionId;

#[derive(Debug, Clone)]
pub struct AddCommand {
    pub url: String,
    pub title: Option<String>,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub collection: Option<CollectionId>,
}

impl BrainCommand for AddCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let collection_id = resolve_collection(ctx, self.collection)?;
        let input = NewBookmark {
            collection_id,
            // Without a title the URL stands in
            title: self.title.clone().unwrap_or_else(|| self.url.clone()),
            url: self.url.clone(),
            description: self.description.clone(),
            tags: collect_tags(&self.tags),
        };

        let bookmark = ctx.service.create_bookmark(&input)?;
        report_sync_state("Added", &bookmark);
        ctx.format.print_bookmarks(&[bookmark], ctx.no_color)
    }
}
