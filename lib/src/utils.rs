use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

pub fn get_default_datadir() -> PathBuf {
    if let Ok(path) = std::env::var("SECONDBRAIN_DATA_DIR") {
        return PathBuf::from(path);
    }

    if let Ok(path) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(path).join("secondbrain");
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local/share/secondbrain");
    }

    #[cfg(target_os = "windows")]
    if let Ok(appdata) = std::env::var("APPDATA") {
        return PathBuf::from(appdata).join("secondbrain");
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

pub fn get_config_dir() -> PathBuf {
    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(path).join("secondbrain");
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config/secondbrain");
    }

    #[cfg(target_os = "windows")]
    if let Ok(appdata) = std::env::var("APPDATA") {
        return PathBuf::from(appdata).join("secondbrain");
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Current time as unix epoch milliseconds
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
