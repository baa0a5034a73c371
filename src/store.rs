//! In-memory cache of the latest probe result per URL

use std::collections::HashMap;

use crate::models::ProbeResult;

/// Latest result per monitored URL. No history is kept: each write replaces
/// the previous entry.
#[derive(Debug, Default)]
pub struct StatusStore {
    results: HashMap<String, ProbeResult>,
}

impl StatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest result, or the `Unknown` sentinel if the URL was never recorded
    pub fn get(&self, url: &str) -> ProbeResult {
        self.results
            .get(url)
            .cloned()
            .unwrap_or_else(ProbeResult::unknown)
    }

    pub fn set(&mut self, url: &str, result: ProbeResult) {
        self.results.insert(url.to_string(), result);
    }

    pub fn remove(&mut self, url: &str) -> Option<ProbeResult> {
        self.results.remove(url)
    }

    /// One entry per URL in `order`, in that order
    pub fn snapshot(&self, order: &[String]) -> Vec<(String, ProbeResult)> {
        order
            .iter()
            .map(|url| (url.clone(), self.get(url)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
