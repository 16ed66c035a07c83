use crate::format::OutputFormat;
use secondbrain::config::Config;
use secondbrain::db::BookmarkDb;
use secondbrain::error::Result;
use secondbrain::service::BookmarkService;

pub struct AppContext<'a> {
    pub service: &'a BookmarkService,
    pub db: &'a BookmarkDb,
    pub config: &'a Config,
    pub format: OutputFormat,
    pub no_color: bool,
}

pub mod add;
pub mod collection;
pub mod delete;
pub mod flags;
pub mod helpers;
pub mod list;
pub mod open;
pub mod search;
pub mod sync;
pub mod tag;
pub mod update;

pub trait BrainCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()>;
}

/// Enum-based dispatch for commands (avoids Box<dyn BrainCommand>)
pub enum CommandEnum {
    Add(add::AddCommand),
    Update(update::UpdateCommand),
    Delete(delete::DeleteCommand),
    Flag(flags::FlagCommand),
    Open(open::OpenCommand),
    List(list::ListCommand),
    Search(search::SearchCommand),
    Tag(tag::TagCommand),
    Sync(sync::SyncCommand),
    Collection(collection::CollectionCommand),
}

impl CommandEnum {
    pub fn execute(&self, ctx: &AppContext) -> Result<()> {
        match self {
            Self::Add(cmd) => cmd.execute(ctx),
            Self::Update(cmd) => cmd.execute(ctx),
            Self::Delete(cmd) => cmd.execute(ctx),
            Self::Flag(cmd) => cmd.execute(ctx),
            Self::Open(cmd) => cmd.execute(ctx),
            Self::List(cmd) => cmd.execute(ctx),
            Self::Search(cmd) => cmd.execute(ctx),
            Self::Tag(cmd) => cmd.execute(ctx),
            Self::Sync(cmd) => cmd.execute(ctx),
            Self::Collection(cmd) => cmd.execute(ctx),
        }
    }
}
