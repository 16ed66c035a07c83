use super::helpers::resolve_collection;
use super::{AppContext, BrainCommand};
use crate::format::traits::BookmarkFormat;
use crate::format::{json::JsonFormat, yaml::YamlFormat, OutputFormat};
use crate::sync_ui::sync_with_spinner;
use secondbrain::error::Result;
use secondbrain::{CollectionId, SyncReport};
use serde::Serialize;

#[derive(Debug, Clone, Default)]
pub struct SyncCommand {
    pub collections: Vec<CollectionId>,
    /// Every local collection
    pub all: bool,
}

#[derive(Debug, Serialize)]
struct CollectionReport {
    collection_id: CollectionId,
    #[serde(flatten)]
    report: SyncReport,
}

impl SyncCommand {
    fn targets(&self, ctx: &AppContext) -> Result<Vec<(CollectionId, String)>> {
        if self.all {
            return Ok(ctx
                .db
                .list_collections()?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect());
        }

        let ids = if self.collections.is_empty() {
            vec![resolve_collection(ctx, None)?]
        } else {
            self.collections.clone()
        };
        let mut targets = Vec::with_capacity(ids.len());
        for id in ids {
            let label = match ctx.db.get_collection(id)? {
                Some(c) => c.name,
                None => format!("collection {}", id),
            };
            targets.push((id, label));
        }
        Ok(targets)
    }
}

impl BrainCommand for SyncCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let targets = self.targets(ctx)?;
        if targets.is_empty() {
            eprintln!("No collections to sync.");
            return Ok(());
        }

        let mut reports = Vec::with_capacity(targets.len());
        let mut first_error = None;
        for (collection_id, label) in targets {
            match sync_with_spinner(ctx.service, collection_id, &label) {
                Ok(report) => {
                    eprintln!("  {}", report);
                    reports.push(CollectionReport {
                        collection_id,
                        report,
                    });
                }
                Err(e) => {
                    eprintln!("  {}", e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match ctx.format {
            OutputFormat::Json => println!("{}", JsonFormat(&reports).render()?),
            OutputFormat::Yaml => print!("{}", YamlFormat(&reports).render()?),
            _ => {}
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
