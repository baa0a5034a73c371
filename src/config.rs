//! Startup settings, read from flags or environment variables

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::models::MonitorConfig;
use crate::models::monitor::DEFAULT_PING_INTERVAL_MS;

#[derive(Debug, Clone, Parser)]
#[command(name = "url-pinger", version, about = "Periodically pings a list of URLs and serves their status")]
pub struct Settings {
    /// Address to listen on
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, short, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Location of the stored URL list and interval
    #[arg(
        long,
        value_name = "FILE",
        env = "CONFIG_STORE",
        default_value = "data/pinger-config.json"
    )]
    pub config_store: PathBuf,

    /// URLs to monitor when no configuration is stored (comma separated)
    #[arg(long, env = "URLS", value_delimiter = ',')]
    pub urls: Vec<String>,

    /// Ping interval in minutes when no configuration is stored. Anything
    /// other than a positive whole number falls back to 10.
    #[arg(long, value_name = "MINUTES", env = "PING_INTERVAL")]
    pub ping_interval: Option<String>,

    /// Per-request probe timeout in seconds
    #[arg(
        long,
        env = "PROBE_TIMEOUT_SECONDS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub probe_timeout: u64,

    /// Directory of dashboard files served for paths outside the API
    #[arg(long, value_name = "DIR", env = "FRONTEND_DIR")]
    pub frontend_dir: Option<PathBuf>,
}

impl Settings {
    /// Cold-start configuration used when the store has nothing usable
    pub fn default_config(&self) -> MonitorConfig {
        let urls = self
            .urls
            .iter()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect();

        MonitorConfig::new(urls, self.default_ping_interval_ms())
    }

    fn default_ping_interval_ms(&self) -> u64 {
        let Some(raw) = self.ping_interval.as_deref() else {
            return DEFAULT_PING_INTERVAL_MS;
        };
        match raw.trim().parse::<u64>() {
            Ok(minutes) if minutes >= 1 => minutes.checked_mul(60_000).unwrap_or_else(|| {
                warn!("PING_INTERVAL of {} minutes is too large, using the default", minutes);
                DEFAULT_PING_INTERVAL_MS
            }),
            _ => {
                warn!("Ignoring invalid PING_INTERVAL {:?}, using the default", raw);
                DEFAULT_PING_INTERVAL_MS
            }
        }
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout)
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
