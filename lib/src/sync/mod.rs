//! Offline-first repository and the bidirectional reconciler.

pub mod reconcile;
pub mod repository;
pub mod watch;

pub use repository::BookmarkRepository;
pub use watch::BookmarkWatch;

use serde::Serialize;
use std::fmt;

/// Local changes made by one pull
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PullSummary {
    pub inserted: usize,
    pub updated: usize,
    pub removed: usize,
}

/// Outcome of `sync_bookmarks`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// False when the pass was skipped for lack of connectivity
    pub online: bool,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub flags_pushed: usize,
    /// Remote calls that failed and were left for a later pass
    pub failures: usize,
    pub pulled: PullSummary,
}

impl SyncReport {
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn online() -> Self {
        Self {
            online: true,
            ..Self::default()
        }
    }

    /// Records confirmed or removed by the push phase
    pub fn pushed(&self) -> usize {
        self.created + self.updated + self.deleted + self.flags_pushed
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.online {
            return write!(f, "offline, nothing synced");
        }
        write!(
            f,
            "pushed {} created, {} updated, {} deleted, {} flags; pulled {} new, {} changed, {} removed",
            self.created,
            self.updated,
            self.deleted,
            self.flags_pushed,
            self.pulled.inserted,
            self.pulled.updated,
            self.pulled.removed
        )?;
        if self.failures > 0 {
            write!(f, "; {} failed", self.failures)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_display() {
        assert_eq!(SyncReport::offline().to_string(), "offline, nothing synced");

        let report = SyncReport {
            created: 1,
            failures: 2,
            ..SyncReport::online()
        };
        let text = report.to_string();
        assert!(text.starts_with("pushed 1 created"));
        assert!(text.ends_with("; 2 failed"));
        assert_eq!(report.pushed(), 1);
    }
}
