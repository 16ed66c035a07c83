use super::AppContext;
use secondbrain::error::{Result, SecondBrainError};
use secondbrain::tags::normalize_tags;
use secondbrain::{Bookmark, CollectionId};
use std::io::{self, Write};

/// The explicit collection, else `default_collection` from the config
pub fn resolve_collection(ctx: &AppContext, explicit: Option<CollectionId>) -> Result<CollectionId> {
    explicit.or(ctx.config.default_collection).ok_or_else(|| {
        SecondBrainError::InvalidInput(
            "No collection given. Pass --collection or set default_collection in config.yml"
                .to_string(),
        )
    })
}

/// `--tag a,b --tag c` style arguments
pub fn collect_tags(raw: &[String]) -> Vec<String> {
    normalize_tags(raw)
}

/// Ask a yes/no question on stdin; anything but y/yes is no
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N]: ", prompt);
    io::stdout().flush()?;

    let mut response = String::new();
    io::stdin().read_line(&mut response)?;
    let response = response.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}

/// Tell the user whether a write reached the server
pub fn report_sync_state(action: &str, bookmark: &Bookmark) {
    if bookmark.is_local_id {
        eprintln!(
            "{} bookmark {} (saved locally, will sync later)",
            action, bookmark.id
        );
    } else if !bookmark.is_synced || bookmark.flags_diverged() {
        eprintln!("{} bookmark {} (pending sync)", action, bookmark.id);
    } else {
        eprintln!("{} bookmark {}", action, bookmark.id);
    }
}
