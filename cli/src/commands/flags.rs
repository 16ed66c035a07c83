use super::{AppContext, BrainCommand};
use secondbrain::error::{Result, SecondBrainError};
use secondbrain::BookmarkId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    Favorite,
    Archive,
}

impl FlagKind {
    fn label(self) -> &'static str {
        match self {
            FlagKind::Favorite => "favorite",
            FlagKind::Archive => "archived",
        }
    }
}

/// Toggle one bookmark's flag, or set it on several at once
#[derive(Debug, Clone)]
pub struct FlagCommand {
    pub kind: FlagKind,
    pub ids: Vec<BookmarkId>,
    /// `None` toggles; only valid with a single id
    pub value: Option<bool>,
}

impl BrainCommand for FlagCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        match (self.value, self.ids.as_slice()) {
            (None, [id]) => {
                let value = match self.kind {
                    FlagKind::Favorite => ctx.service.toggle_favorite(*id)?,
                    FlagKind::Archive => ctx.service.toggle_archive(*id)?,
                };
                let state = if value { "now" } else { "no longer" };
                eprintln!("Bookmark {} is {} {}", id, state, self.kind.label());
                Ok(())
            }
            (None, _) => Err(SecondBrainError::InvalidInput(
                "Pass --on or --off to change several bookmarks at once".to_string(),
            )),
            (Some(value), ids) => {
                let changed = match self.kind {
                    FlagKind::Favorite => ctx.service.set_favorite(ids, value)?,
                    FlagKind::Archive => ctx.service.set_archived(ids, value)?,
                };
                eprintln!("Updated {} bookmark(s)", changed);
                Ok(())
            }
        }
    }
}
