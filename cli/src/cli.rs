use crate::commands::{
    add::AddCommand, collection::CollectionCommand, delete::DeleteCommand, flags::FlagCommand,
    flags::FlagKind, list::ListCommand, open::OpenCommand, search::SearchCommand,
    sync::SyncCommand, tag::TagCommand, update::UpdateCommand, AppContext, CommandEnum,
};
use clap::{Args, Parser, Subcommand};
use secondbrain::error::Result;
use secondbrain::{BookmarkId, CollectionId};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional custom database file path
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Optional custom configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable color output
    #[arg(long, global = true)]
    pub nc: bool,

    /// Show debug information
    #[arg(short = 'g', long = "debug", global = true)]
    pub debug: bool,

    /// Output format: colored (default), plain, json, yaml
    #[arg(short = 'f', long, global = true)]
    pub format: Option<String>,

    /// Never contact the server; changes stay local until the next sync
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Copy)]
#[group(multiple = false)]
pub struct FlagValue {
    /// Set the flag (required for several ids)
    #[arg(long)]
    pub on: bool,

    /// Clear the flag
    #[arg(long)]
    pub off: bool,
}

impl FlagValue {
    fn value(self) -> Option<bool> {
        match (self.on, self.off) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new bookmark
    Add {
        /// URL to bookmark
        url: String,

        /// Bookmark title (defaults to the URL)
        #[arg(long)]
        title: Option<String>,

        /// Comma-separated tags
        #[arg(short, long)]
        tag: Vec<String>,

        /// Notes or description
        #[arg(short, long)]
        description: Option<String>,

        /// Target collection (defaults to default_collection)
        #[arg(short, long)]
        collection: Option<CollectionId>,
    },

    /// Update an existing bookmark
    Update {
        /// Bookmark id
        #[arg(allow_hyphen_values = true)]
        id: BookmarkId,

        /// New URL
        #[arg(long)]
        url: Option<String>,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description (empty clears it)
        #[arg(short, long)]
        description: Option<String>,

        /// Replace all tags
        #[arg(short, long)]
        tag: Option<Vec<String>>,

        /// Move to another collection
        #[arg(short, long)]
        collection: Option<CollectionId>,
    },

    /// Delete bookmark(s)
    Delete {
        /// Bookmark ids
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        ids: Vec<BookmarkId>,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Toggle or set the favorite flag
    Favorite {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        ids: Vec<BookmarkId>,

        #[command(flatten)]
        value: FlagValue,
    },

    /// Toggle or set the archive flag
    Archive {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        ids: Vec<BookmarkId>,

        #[command(flatten)]
        value: FlagValue,
    },

    /// Open bookmark(s) in the browser
    Open {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        ids: Vec<BookmarkId>,
    },

    /// List bookmarks
    List {
        /// Only this collection (defaults to default_collection)
        #[arg(short, long)]
        collection: Option<CollectionId>,

        /// Only favorites
        #[arg(long, conflicts_with = "archived")]
        favorites: bool,

        /// Only archived bookmarks
        #[arg(long)]
        archived: bool,

        /// Show only the newest N entries
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Search title, description, URL and tags
    Search {
        /// Search keywords
        #[arg(required = true)]
        keywords: Vec<String>,

        /// Show only the first N matches
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// List bookmarks carrying a tag
    Tag { tag: String },

    /// Push local changes and pull server state
    Sync {
        /// Collections to sync (defaults to default_collection)
        collections: Vec<CollectionId>,

        /// Sync every local collection
        #[arg(short, long, conflicts_with = "collections")]
        all: bool,
    },

    /// Manage local collections
    #[command(subcommand)]
    Collection(CollectionAction),
}

#[derive(Subcommand)]
pub enum CollectionAction {
    /// Create a collection
    Add {
        name: String,

        #[arg(short, long)]
        description: Option<String>,

        /// Display color, e.g. "#6366F1"
        #[arg(long)]
        color: Option<String>,
    },

    /// List collections with their bookmark counts
    List,

    /// Delete a collection; its bookmarks are kept
    Delete {
        id: CollectionId,

        #[arg(short, long)]
        force: bool,
    },
}

impl Commands {
    pub fn into_command(self) -> CommandEnum {
        match self {
            Commands::Add {
                url,
                title,
                tag,
                description,
                collection,
            } => CommandEnum::Add(AddCommand {
                url,
                title,
                tags: tag,
                description,
                collection,
            }),
            Commands::Update {
                id,
                url,
                title,
                description,
                tag,
                collection,
            } => CommandEnum::Update(UpdateCommand {
                id,
                url,
                title,
                description,
                tags: tag,
                collection,
            }),
            Commands::Delete { ids, force } => CommandEnum::Delete(DeleteCommand { ids, force }),
            Commands::Favorite { ids, value } => CommandEnum::Flag(FlagCommand {
                kind: FlagKind::Favorite,
                ids,
                value: value.value(),
            }),
            Commands::Archive { ids, value } => CommandEnum::Flag(FlagCommand {
                kind: FlagKind::Archive,
                ids,
                value: value.value(),
            }),
            Commands::Open { ids } => CommandEnum::Open(OpenCommand { ids }),
            Commands::List {
                collection,
                favorites,
                archived,
                limit,
            } => CommandEnum::List(ListCommand {
                collection,
                favorites,
                archived,
                limit,
            }),
            Commands::Search { keywords, limit } => {
                CommandEnum::Search(SearchCommand { keywords, limit })
            }
            Commands::Tag { tag } => CommandEnum::Tag(TagCommand { tag }),
            Commands::Sync { collections, all } => {
                CommandEnum::Sync(SyncCommand { collections, all })
            }
            Commands::Collection(action) => CommandEnum::Collection(match action {
                CollectionAction::Add {
                    name,
                    description,
                    color,
                } => CollectionCommand::Add {
                    name,
                    description,
                    color,
                },
                CollectionAction::List => CollectionCommand::List,
                CollectionAction::Delete { id, force } => CollectionCommand::Delete { id, force },
            }),
        }
    }
}

pub fn handle_args(command: Commands, ctx: &AppContext) -> Result<()> {
    command.into_command().execute(ctx)
}
