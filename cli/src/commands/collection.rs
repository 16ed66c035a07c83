use super::helpers::confirm;
use super::{AppContext, BrainCommand};
use secondbrain::error::{Result, SecondBrainError};
use secondbrain::CollectionId;

#[derive(Debug, Clone)]
pub enum CollectionCommand {
    Add {
        name: String,
        description: Option<String>,
        color: Option<String>,
    },
    List,
    Delete {
        id: CollectionId,
        force: bool,
    },
}

impl BrainCommand for CollectionCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        match self {
            CollectionCommand::Add {
                name,
                description,
                color,
            } => {
                if name.trim().is_empty() {
                    return Err(SecondBrainError::InvalidInput(
                        "Collection name must not be blank".to_string(),
                    ));
                }
                let id = ctx
                    .db
                    .create_collection(name, description.as_deref(), color.as_deref())?;
                eprintln!("Added collection {} ({})", id, name.trim());
                Ok(())
            }
            CollectionCommand::List => {
                let collections = ctx.db.list_collections()?;
                if collections.is_empty() {
                    eprintln!("No collections yet.");
                    return Ok(());
                }
                ctx.format.print_collections(&collections, ctx.no_color)
            }
            CollectionCommand::Delete { id, force } => {
                let collection = ctx
                    .db
                    .get_collection(*id)?
                    .ok_or(SecondBrainError::CollectionNotFound(*id))?;

                let prompt = format!(
                    "Delete collection '{}'? Its {} bookmark(s) are kept without a collection.",
                    collection.name, collection.bookmark_count
                );
                if !*force && !confirm(&prompt)? {
                    eprintln!("Deletion cancelled.");
                    return Ok(());
                }

                ctx.db.delete_collection(*id)?;
                eprintln!("Deleted collection {}", collection.name);
                Ok(())
            }
        }
    }
}
