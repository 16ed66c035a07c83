use crate::error::{Result, SecondBrainError};

/// Launch the system browser on `url`
pub fn open_url(url: &str) -> Result<()> {
    open::that(url).map_err(|e| SecondBrainError::Browser(format!("cannot open {}: {}", url, e)))
}
