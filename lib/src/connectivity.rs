//! Whether the device can currently reach the server.

use crate::error::{Result, SecondBrainError};
use log::debug;
use reqwest::Url;
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Queried before every remote attempt; never cached by callers
pub trait ConnectivityOracle: Send + Sync {
    fn is_online(&self) -> bool;
}

/// A switch flipped by hand (tests, `--offline`)
#[derive(Debug)]
pub struct ManualConnectivity {
    online: AtomicBool,
}

impl ManualConnectivity {
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

impl ConnectivityOracle for ManualConnectivity {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

/// Online when a TCP connection to the API host succeeds within the timeout
#[derive(Debug, Clone)]
pub struct TcpProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Probe the host and port of an API base URL
    pub fn for_url(api_base_url: &str, timeout: Duration) -> Result<Self> {
        let url = Url::parse(api_base_url)
            .map_err(|e| SecondBrainError::Config(format!("api_base_url '{}': {}", api_base_url, e)))?;
        let host = url.host_str().ok_or_else(|| {
            SecondBrainError::Config(format!("api_base_url '{}' has no host", api_base_url))
        })?;
        let port = url.port_or_known_default().ok_or_else(|| {
            SecondBrainError::Config(format!("api_base_url '{}' has no port", api_base_url))
        })?;
        Ok(Self::new(host.trim_matches(&['[', ']'][..]), port, timeout))
    }

    pub fn target(&self) -> (&str, u16) {
        (&self.host, self.port)
    }
}

impl ConnectivityOracle for TcpProbe {
    fn is_online(&self) -> bool {
        let addrs = match (self.host.as_str(), self.port).to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(e) => {
                debug!("Cannot resolve {}: {}", self.host, e);
                return false;
            }
        };

        for addr in addrs {
            if TcpStream::connect_timeout(&addr, self.timeout).is_ok() {
                return true;
            }
        }
        debug!("{}:{} unreachable", self.host, self.port);
        false
    }
}
