use indicatif::{ProgressBar, ProgressStyle};
use secondbrain::error::{Result, SecondBrainError};
use secondbrain::service::BookmarkService;
use secondbrain::{CollectionId, SyncReport};
use std::error::Error;

/// Sync one collection behind an animated spinner, then show the outcome
pub fn sync_with_spinner(
    service: &BookmarkService,
    collection_id: CollectionId,
    label: &str,
) -> Result<SyncReport> {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }

    let label = truncate_label(label, 40);
    spinner.set_message(format!("Syncing: {}", label));
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = service.sync(collection_id);

    match &result {
        Ok(report) if !report.online => {
            spinner.finish_with_message(format!("- {} (offline)", label))
        }
        Ok(report) if report.failures > 0 => spinner.finish_with_message(format!(
            "! {} ({} change(s) left for later)",
            label, report.failures
        )),
        Ok(_) => spinner.finish_with_message(format!("✓ {}", label)),
        Err(e) => {
            spinner.finish_with_message(format!("✗ {} ({})", label, categorize_error(e)))
        }
    }

    result
}

/// Truncate a label to `max_len` characters with an ellipsis
pub fn truncate_label(label: &str, max_len: usize) -> String {
    if label.chars().count() > max_len {
        let keep = max_len.saturating_sub(3);
        format!("{}...", label.chars().take(keep).collect::<String>())
    } else {
        label.to_string()
    }
}

/// Short, user-facing category of a sync failure
pub fn categorize_error(error: &SecondBrainError) -> &'static str {
    if let SecondBrainError::Remote(remote) = error {
        if remote.is_timeout() {
            return "timeout";
        }
        match remote.status() {
            Some(401) | Some(403) => return "unauthorized",
            Some(404) => return "not found",
            Some(429) => return "rate limited",
            Some(500..=599) => return "server error",
            _ => {}
        }
        let text = remote.to_string().to_lowercase();
        if text.contains("dns") {
            return "dns error";
        }
        if text.contains("connect") {
            return "connection error";
        }
        if remote.source().is_some() {
            return "network error";
        }
        return "bad response";
    }
    match error {
        SecondBrainError::Database(_) => "database error",
        SecondBrainError::Validation(_) => "invalid input",
        _ => "sync error",
    }
}
