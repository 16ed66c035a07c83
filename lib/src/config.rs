use crate::error::{Result, SecondBrainError};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the bookmark REST service
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Optional bearer token sent with every request
    #[serde(default)]
    pub api_token: Option<String>,

    /// User-agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout handed to the HTTP client
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Timeout of the TCP reachability probe used as the connectivity oracle
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Collection used by commands when none is given
    #[serde(default)]
    pub default_collection: Option<i64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_token: None,
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout_secs(),
            probe_timeout_ms: default_probe_timeout_ms(),
            default_collection: None,
        }
    }
}

fn default_api_base_url() -> String {
    "http://localhost:8080/api/".to_string()
}

fn default_user_agent() -> String {
    format!("secondbrain/{}", env!("CARGO_PKG_VERSION"))
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_probe_timeout_ms() -> u64 {
    1500
}

impl Config {
    /// Load configuration from a file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.check()?;
        Ok(config)
    }

    /// Load configuration from default location (~/.config/secondbrain/config.yml)
    /// Falls back to default config if file doesn't exist
    pub fn load() -> Self {
        let config_path = crate::utils::get_config_dir().join("config.yml");

        if config_path.exists() {
            match Self::load_from_path(&config_path) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Failed to load config from {:?}: {}", config_path, e);
                    warn!("Using default configuration");
                    Self::default()
                }
            }
        } else {
            Self::default()
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    fn check(&self) -> Result<()> {
        reqwest::Url::parse(&self.api_base_url).map_err(|e| {
            SecondBrainError::Config(format!("api_base_url '{}': {}", self.api_base_url, e))
        })?;
        if self.request_timeout_secs == 0 {
            return Err(SecondBrainError::Config(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
