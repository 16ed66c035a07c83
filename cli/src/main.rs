mod cli;
mod commands;
mod format;
mod output;
mod sync_ui;

use clap::Parser;
use log::debug;
use secondbrain::connectivity::{ConnectivityOracle, ManualConnectivity, TcpProbe};
use secondbrain::remote::HttpRemote;
use secondbrain::service::BookmarkService;
use secondbrain::{config, db, error::Result, utils, BookmarkRepository};
use std::sync::Arc;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let filter = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let db_path = match &args.db {
        Some(path) => path.clone(),
        None => utils::get_default_datadir().join("bookmarks.db"),
    };
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let db = Arc::new(db::BookmarkDb::init(&db_path)?);

    let cfg = match &args.config {
        Some(config_path) => config::Config::load_from_path(config_path)?,
        None => config::Config::load(),
    };

    let connectivity: Arc<dyn ConnectivityOracle> = if args.offline {
        Arc::new(ManualConnectivity::new(false))
    } else {
        Arc::new(TcpProbe::for_url(&cfg.api_base_url, cfg.probe_timeout())?)
    };
    let remote = Arc::new(HttpRemote::new(&cfg)?);
    debug!("Using database {:?} and server {}", db_path, remote.base_url());

    let repo = BookmarkRepository::new(db.clone(), remote, connectivity);
    let service = BookmarkService::new(repo);

    let ctx = commands::AppContext {
        service: &service,
        db: &db,
        config: &cfg,
        format: format::OutputFormat::from_string(args.format.as_deref().unwrap_or("colored")),
        no_color: args.nc,
    };

    cli::handle_args(args.command, &ctx)
}
