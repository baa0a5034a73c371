//! Single-URL HTTP probe

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::errors::{PingerError, Result};
use crate::models::ProbeResult;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can check one URL and report the outcome
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeResult;
}

/// Plain HTTP GET prober
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: HttpClient,
    timeout: Duration,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(timeout)
            .user_agent(format!("url-pinger/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(PingerError::Http)?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Probe for HttpProber {
    async fn probe(&self, url: &str) -> ProbeResult {
        let start_time = Instant::now();

        // Any HTTP response counts as reachable; only transport errors are down.
        match self.client.get(url).send().await {
            Ok(response) => {
                let elapsed = start_time.elapsed().as_millis() as u64;
                let code = response.status().as_u16();
                info!("{} responded with {} in {}ms", url, code, elapsed);
                ProbeResult::responded(code, elapsed)
            }
            Err(e) => {
                warn!("{} failed: {}", url, e);
                ProbeResult::down()
            }
        }
    }
}
