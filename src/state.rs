use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{MonitorConfig, ProbeResult};
use crate::services::scheduler::Scheduler;
use crate::store::StatusStore;

// App state
pub struct AppState {
    pub scheduler: Arc<Scheduler>,
}

impl AppState {
    pub fn new(scheduler: Arc<Scheduler>) -> Self {
        Self { scheduler }
    }
}

/// Everything the scheduler mutates. Always accessed behind the scheduler's
/// single lock so URL set, interval, pinging flag and results change together.
#[derive(Debug)]
pub struct MonitorState {
    pub config: MonitorConfig,
    pub store: StatusStore,
    // Bumped on every add, so a result from before a remove/re-add is stale
    generations: HashMap<String, u64>,
    next_generation: u64,
}

impl MonitorState {
    pub fn new(config: MonitorConfig) -> Self {
        let mut state = Self {
            config: MonitorConfig::new(Vec::new(), config.ping_interval_ms),
            store: StatusStore::new(),
            generations: HashMap::new(),
            next_generation: 0,
        };
        state.config.is_pinging = config.is_pinging;
        for url in &config.urls {
            state.add_url(url);
        }
        state
    }

    /// Start tracking a URL with an `Unknown` result. Returns false if it
    /// was already present.
    pub fn add_url(&mut self, url: &str) -> bool {
        if !self.config.add_url(url) {
            return false;
        }
        self.next_generation += 1;
        self.generations.insert(url.to_string(), self.next_generation);
        self.store.set(url, ProbeResult::unknown());
        true
    }

    /// Stop tracking a URL and drop its result
    pub fn remove_url(&mut self, url: &str) -> bool {
        self.generations.remove(url);
        self.store.remove(url);
        self.config.remove_url(url)
    }

    /// URLs in order, each with the generation a result must match
    pub fn tracked_urls(&self) -> Vec<(String, u64)> {
        self.config
            .urls
            .iter()
            .map(|url| (url.clone(), self.generations.get(url).copied().unwrap_or_default()))
            .collect()
    }

    /// Store a probe result, unless the URL was removed (or removed and
    /// re-added) while it was in flight
    pub fn record(&mut self, url: &str, generation: u64, result: ProbeResult) -> bool {
        if self.generations.get(url) != Some(&generation) {
            return false;
        }
        self.store.set(url, result);
        true
    }

    pub fn snapshot(&self) -> Vec<(String, ProbeResult)> {
        self.store.snapshot(&self.config.urls)
    }
}
