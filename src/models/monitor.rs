use serde::{Deserialize, Serialize};

/// Default ping interval: 10 minutes
pub const DEFAULT_PING_INTERVAL_MS: u64 = 10 * 60 * 1000;

/// Live monitoring configuration owned by the scheduler
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorConfig {
    pub urls: Vec<String>,
    #[serde(rename = "pingInterval")]
    pub ping_interval_ms: u64,
    /// Runtime only, never persisted
    pub is_pinging: bool,
}

impl MonitorConfig {
    pub fn new(urls: Vec<String>, ping_interval_ms: u64) -> Self {
        let mut config = Self {
            urls: Vec::with_capacity(urls.len()),
            ping_interval_ms: ping_interval_ms.max(1),
            is_pinging: true,
        };
        for url in urls {
            config.add_url(&url);
        }
        config
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.iter().any(|u| u == url)
    }

    /// Append a URL; returns false if it was already monitored
    pub fn add_url(&mut self, url: &str) -> bool {
        if url.is_empty() || self.contains(url) {
            return false;
        }
        self.urls.push(url.to_string());
        true
    }

    /// Remove a URL; returns false if it was not monitored
    pub fn remove_url(&mut self, url: &str) -> bool {
        let original_len = self.urls.len();
        self.urls.retain(|u| u != url);
        self.urls.len() != original_len
    }
}

impl From<StoredConfig> for MonitorConfig {
    fn from(stored: StoredConfig) -> Self {
        MonitorConfig::new(stored.urls, stored.ping_interval)
    }
}

/// Durable subset of the configuration, as written by a gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredConfig {
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default = "default_ping_interval")]
    pub ping_interval: u64,
}

fn default_ping_interval() -> u64 {
    DEFAULT_PING_INTERVAL_MS
}
