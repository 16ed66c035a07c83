use super::helpers::{collect_tags, report_sync_state};
use super::{AppContext, BrainCommand};
use secondbrain::error::{Result, SecondBrainError};
use secondbrain::{BookmarkId, CollectionId};

#[derive(Debug, Clone, Default)]
pub struct UpdateCommand {
    pub id: BookmarkId,
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Replaces the whole tag set when given
    pub tags: Option<Vec<String>>,
    pub collection: Option<CollectionId>,
}

impl UpdateCommand {
    fn has_changes(&self) -> bool {
        self.url.is_some()
            || self.title.is_some()
            || self.description.is_some()
            || self.tags.is_some()
            || self.collection.is_some()
    }
}

impl BrainCommand for UpdateCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        if !self.has_changes() {
            return Err(SecondBrainError::InvalidInput(
                "Nothing to update. Pass --url, --title, --description, --tag or --collection"
                    .to_string(),
            ));
        }

        let mut bookmark = ctx.service.get_bookmark(self.id)?;
        if let Some(url) = &self.url {
            bookmark.url = url.clone();
        }
        if let Some(title) = &self.title {
            bookmark.title = title.clone();
        }
        if let Some(description) = &self.description {
            bookmark.description = Some(description.clone());
        }
        if let Some(tags) = &self.tags {
            bookmark.tags = collect_tags(tags);
        }
        if let Some(collection) = self.collection {
            bookmark.collection_id = Some(collection);
        }

        ctx.service.update_bookmark(&bookmark)?;
        let stored = ctx.service.get_bookmark(self.id)?;
        report_sync_state("Updated", &stored);
        Ok(())
    }
}
