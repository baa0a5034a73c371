//! Recurring sweep scheduling and live reconfiguration

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info, instrument, warn};

use crate::errors::{PingerError, Result};
use crate::models::{MonitorConfig, ProbeResult};
use crate::services::gateway::ConfigGateway;
use crate::services::prober::Probe;
use crate::services::sweep::{SweepSummary, run_sweep};
use crate::state::MonitorState;

const MS_PER_MINUTE: u64 = 60_000;

/// Consistent view of configuration and results, taken under one lock
#[derive(Debug, Clone)]
pub struct StatusSnapshot {
    pub config: MonitorConfig,
    pub results: Vec<(String, ProbeResult)>,
}

/// Owns the monitored URL set, the status cache and the repeating sweep timer.
///
/// All mutations go through `state`, so concurrent API calls and sweep
/// writes are serialized. Pausing only gates sweeps: the timer keeps firing
/// so the cadence is unchanged on resume.
pub struct Scheduler {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<MonitorState>,
    probe: Arc<dyn Probe>,
    gateway: Arc<dyn ConfigGateway>,
    sweep_gate: Mutex<()>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl Scheduler {
    pub fn new(
        config: MonitorConfig,
        probe: Arc<dyn Probe>,
        gateway: Arc<dyn ConfigGateway>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(MonitorState::new(config)),
                probe,
                gateway,
                sweep_gate: Mutex::new(()),
                timer: Mutex::new(None),
            }),
        }
    }

    /// Build a scheduler from the stored configuration, or from `defaults`
    /// when nothing is stored or the gateway cannot be read.
    pub async fn bootstrap(
        defaults: MonitorConfig,
        probe: Arc<dyn Probe>,
        gateway: Arc<dyn ConfigGateway>,
    ) -> Self {
        let config = match gateway.load().await {
            Ok(Some(stored)) => {
                info!(
                    "Loaded stored configuration with {} URLs every {}ms",
                    stored.urls.len(),
                    stored.ping_interval
                );
                MonitorConfig::from(stored)
            }
            Ok(None) => {
                info!("No stored configuration, using defaults");
                defaults
            }
            Err(e) => {
                error!("Failed to load configuration, using defaults: {}", e);
                defaults
            }
        };

        Self::new(config, probe, gateway)
    }

    /// Sweep now, then every `ping_interval_ms`. Any previously armed timer
    /// is cancelled first.
    #[instrument(skip(self))]
    pub async fn start(&self) {
        let mut timer = self.inner.timer.lock().await;
        if let Some(handle) = timer.take() {
            handle.abort();
        }

        let period = Duration::from_millis(self.inner.state.lock().await.config.ping_interval_ms);
        info!("Scheduling sweeps every {}ms", period.as_millis());

        let inner = Arc::clone(&self.inner);
        *timer = Some(tokio::spawn(inner.run_timer(period)));
    }

    /// Cancel the timer. A sweep already in progress runs to completion.
    pub async fn stop(&self) {
        if let Some(handle) = self.inner.timer.lock().await.take() {
            handle.abort();
            info!("Sweep timer stopped");
        }
    }

    pub async fn is_scheduled(&self) -> bool {
        self.inner
            .timer
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Run a sweep immediately, waiting for any sweep already in progress
    pub async fn sweep_now(&self) -> Option<SweepSummary> {
        let _guard = self.inner.sweep_gate.lock().await;
        run_sweep(&self.inner.state, self.inner.probe.as_ref()).await
    }

    /// Change the interval and restart the cadence from now, including an
    /// immediate sweep. Returns the new interval in milliseconds.
    pub async fn set_interval(&self, minutes: i64) -> Result<u64> {
        if minutes < 1 {
            return Err(PingerError::invalid_input("Invalid interval value"));
        }
        let ping_interval_ms = (minutes as u64)
            .checked_mul(MS_PER_MINUTE)
            .ok_or_else(|| PingerError::invalid_input("Invalid interval value"))?;

        {
            let mut state = self.inner.state.lock().await;
            state.config.ping_interval_ms = ping_interval_ms;
            self.inner.persist(&state.config).await;
        }
        info!("Ping interval set to {} minutes", minutes);

        self.start().await;
        Ok(ping_interval_ms)
    }

    /// Add a URL to the monitored set. Returns the resulting URL list.
    pub async fn add_url(&self, url: &str) -> Result<Vec<String>> {
        let url = url.trim();
        if url.is_empty() {
            return Err(PingerError::invalid_input("URL is required"));
        }

        let mut state = self.inner.state.lock().await;
        if state.add_url(url) {
            self.inner.persist(&state.config).await;
            info!("Now monitoring {}", url);
        }
        Ok(state.config.urls.clone())
    }

    /// Remove a URL and its result. Removing an unknown URL is not an error.
    pub async fn remove_url(&self, url: &str) -> Vec<String> {
        let url = url.trim();
        let mut state = self.inner.state.lock().await;
        if state.remove_url(url) {
            info!("Stopped monitoring {}", url);
        }
        self.inner.persist(&state.config).await;
        state.config.urls.clone()
    }

    /// Flip the pinging flag, returning the new value
    pub async fn toggle_pinging(&self) -> bool {
        let mut state = self.inner.state.lock().await;
        state.config.is_pinging = !state.config.is_pinging;
        info!("Pinging {}", if state.config.is_pinging { "resumed" } else { "paused" });
        state.config.is_pinging
    }

    pub async fn config(&self) -> MonitorConfig {
        self.inner.state.lock().await.config.clone()
    }

    pub async fn snapshot(&self) -> StatusSnapshot {
        let state = self.inner.state.lock().await;
        StatusSnapshot {
            config: state.config.clone(),
            results: state.snapshot(),
        }
    }
}

impl Inner {
    async fn run_timer(self: Arc<Self>, period: Duration) {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            // Sweeps run outside the timer task so cancelling the timer never
            // cancels a probe in flight.
            let inner = Arc::clone(&self);
            tokio::spawn(async move {
                inner.sweep_on_tick().await;
            });
        }
    }

    async fn sweep_on_tick(&self) -> Option<SweepSummary> {
        let Ok(_guard) = self.sweep_gate.try_lock() else {
            warn!("Previous sweep still running, skipping this tick");
            return None;
        };
        run_sweep(&self.state, self.probe.as_ref()).await
    }

    async fn persist(&self, config: &MonitorConfig) {
        if let Err(e) = self.gateway.save(&config.urls, config.ping_interval_ms).await {
            error!("Failed to save configuration: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProbeStatus, StoredConfig};
    use crate::services::gateway::MemoryGateway;
    use crate::services::testing::{FailingGateway, FakeProbe};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    const TEN_MINUTES: u64 = 10 * MS_PER_MINUTE;

    fn scheduler_with(
        urls: &[&str],
        ping_interval_ms: u64,
    ) -> (Scheduler, Arc<FakeProbe>, Arc<MemoryGateway>) {
        let probe = Arc::new(FakeProbe::new());
        let gateway = Arc::new(MemoryGateway::new());
        let urls = urls.iter().map(|u| u.to_string()).collect();
        let scheduler = Scheduler::new(
            MonitorConfig::new(urls, ping_interval_ms),
            probe.clone(),
            gateway.clone(),
        );
        (scheduler, probe, gateway)
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test]
    async fn test_bootstrap_prefers_stored_config() {
        let gateway = Arc::new(MemoryGateway::with_config(StoredConfig {
            urls: vec!["http://stored".to_string()],
            ping_interval: 120_000,
        }));
        let defaults = MonitorConfig::new(vec!["http://default".to_string()], TEN_MINUTES);

        let scheduler = Scheduler::bootstrap(defaults, Arc::new(FakeProbe::new()), gateway).await;
        let config = scheduler.config().await;
        assert_eq!(config.urls, vec!["http://stored"]);
        assert_eq!(config.ping_interval_ms, 120_000);
        assert!(config.is_pinging);
    }

    #[tokio::test]
    async fn test_bootstrap_falls_back_to_defaults() {
        let defaults = MonitorConfig::new(vec!["http://default".to_string()], TEN_MINUTES);

        let scheduler =
            Scheduler::bootstrap(defaults.clone(), Arc::new(FakeProbe::new()), Arc::new(FailingGateway)).await;
        assert_eq!(scheduler.config().await, defaults);

        let scheduler =
            Scheduler::bootstrap(defaults.clone(), Arc::new(FakeProbe::new()), Arc::new(MemoryGateway::new())).await;
        assert_eq!(scheduler.config().await, defaults);

        let snapshot = scheduler.snapshot().await;
        assert_eq!(snapshot.results[0].1.status, ProbeStatus::Unknown);
    }

    #[tokio::test]
    async fn test_sweep_covers_every_url_once() {
        let (scheduler, probe, _) = scheduler_with(&["http://a", "http://b"], TEN_MINUTES);

        let summary = scheduler.sweep_now().await.unwrap();
        assert_eq!(summary.probed, 2);

        let snapshot = scheduler.snapshot().await;
        assert_eq!(snapshot.results.len(), 2);
        assert!(snapshot.results.iter().all(|(_, r)| r.status == ProbeStatus::Ok(200)));
        assert_eq!(probe.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_sweeps_immediately_then_on_interval() {
        let (scheduler, probe, _) = scheduler_with(&["http://a"], TEN_MINUTES);

        scheduler.start().await;
        advance(1).await;
        assert_eq!(probe.call_count(), 1);
        assert!(scheduler.is_scheduled().await);

        advance(TEN_MINUTES).await;
        assert_eq!(probe.call_count(), 2);

        advance(TEN_MINUTES).await;
        assert_eq!(probe.call_count(), 3);

        scheduler.stop().await;
        assert!(!scheduler.is_scheduled().await);
        advance(TEN_MINUTES * 3).await;
        assert_eq!(probe.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_sweep_the_current_url_set() {
        let (scheduler, probe, _) = scheduler_with(&["http://a"], TEN_MINUTES);

        scheduler.start().await;
        advance(1).await;
        scheduler.add_url("http://b").await.unwrap();
        assert_eq!(probe.call_count(), 1);

        advance(TEN_MINUTES).await;
        assert_eq!(probe.calls(), vec!["http://a", "http://a", "http://b"]);
        scheduler.stop().await;
    }

    #[tokio::test]
    async fn test_set_interval_rejects_non_positive() {
        let (scheduler, _, gateway) = scheduler_with(&["http://a"], TEN_MINUTES);

        for minutes in [0, -5] {
            let err = scheduler.set_interval(minutes).await.unwrap_err();
            assert!(matches!(err, PingerError::InvalidInput(_)));
        }
        assert!(matches!(
            scheduler.set_interval(i64::MAX).await,
            Err(PingerError::InvalidInput(_))
        ));

        assert_eq!(scheduler.config().await.ping_interval_ms, TEN_MINUTES);
        assert!(!scheduler.is_scheduled().await);
        assert!(gateway.stored().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_interval_restarts_cadence() {
        let (scheduler, probe, gateway) = scheduler_with(&["http://a"], TEN_MINUTES);

        scheduler.start().await;
        advance(1).await;
        assert_eq!(probe.call_count(), 1);

        // Five minutes in, switch to three minutes: immediate sweep, then t=8
        advance(5 * MS_PER_MINUTE).await;
        assert_eq!(scheduler.set_interval(3).await.unwrap(), 3 * MS_PER_MINUTE);
        advance(1).await;
        assert_eq!(probe.call_count(), 2);

        advance(3 * MS_PER_MINUTE).await;
        assert_eq!(probe.call_count(), 3);

        // The old ten minute tick must not fire
        advance(2 * MS_PER_MINUTE + 30_000).await;
        assert_eq!(probe.call_count(), 3);

        let stored = gateway.stored().await.unwrap();
        assert_eq!(stored.ping_interval, 3 * MS_PER_MINUTE);
        assert_eq!(scheduler.config().await.ping_interval_ms, 3 * MS_PER_MINUTE);
        scheduler.stop().await;
    }

    #[tokio::test]
    async fn test_add_url_is_idempotent_and_persists() {
        let (scheduler, probe, gateway) = scheduler_with(&[], TEN_MINUTES);

        assert_eq!(scheduler.add_url("http://a").await.unwrap(), vec!["http://a"]);
        assert_eq!(scheduler.add_url("http://a").await.unwrap(), vec!["http://a"]);

        let snapshot = scheduler.snapshot().await;
        assert_eq!(snapshot.results.len(), 1);
        assert_eq!(snapshot.results[0].1.status, ProbeStatus::Unknown);
        assert_eq!(gateway.stored().await.unwrap().urls, vec!["http://a"]);
        // Adding never triggers an out-of-cycle sweep
        assert_eq!(probe.call_count(), 0);
    }

    #[tokio::test]
    async fn test_add_empty_url_is_invalid() {
        let (scheduler, _, gateway) = scheduler_with(&[], TEN_MINUTES);

        for url in ["", "   "] {
            assert!(matches!(
                scheduler.add_url(url).await,
                Err(PingerError::InvalidInput(_))
            ));
        }
        assert!(scheduler.config().await.urls.is_empty());
        assert!(gateway.stored().await.is_none());
    }

    #[tokio::test]
    async fn test_remove_url() {
        let (scheduler, _, gateway) = scheduler_with(&["http://a", "http://b"], TEN_MINUTES);
        scheduler.sweep_now().await;

        assert_eq!(scheduler.remove_url("http://a").await, vec!["http://b"]);
        let snapshot = scheduler.snapshot().await;
        assert_eq!(snapshot.results.len(), 1);
        assert_eq!(snapshot.results[0].0, "http://b");
        assert_eq!(gateway.stored().await.unwrap().urls, vec!["http://b"]);
    }

    #[tokio::test]
    async fn test_remove_unknown_url_changes_nothing() {
        let (scheduler, _, _) = scheduler_with(&["http://a"], TEN_MINUTES);
        let before = scheduler.config().await;

        assert_eq!(scheduler.remove_url("http://never-added").await, vec!["http://a"]);
        assert_eq!(scheduler.config().await, before);
        assert_eq!(scheduler.snapshot().await.results.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_matches_add_whitespace_handling() {
        let (scheduler, _, gateway) = scheduler_with(&[], TEN_MINUTES);

        assert_eq!(scheduler.add_url(" http://a ").await.unwrap(), vec!["http://a"]);
        assert!(scheduler.remove_url(" http://a").await.is_empty());
        assert!(scheduler.snapshot().await.results.is_empty());
        assert!(gateway.stored().await.unwrap().urls.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_gates_sweeps_without_cancelling_timer() {
        let (scheduler, probe, _) = scheduler_with(&["http://a"], TEN_MINUTES);

        scheduler.start().await;
        advance(1).await;
        assert_eq!(probe.call_count(), 1);

        assert!(!scheduler.toggle_pinging().await);
        advance(2 * TEN_MINUTES + 1).await;
        assert_eq!(probe.call_count(), 1);
        assert!(scheduler.is_scheduled().await);

        // Resumes on the next tick of the original cadence (t=30)
        assert!(scheduler.toggle_pinging().await);
        advance(TEN_MINUTES).await;
        assert_eq!(probe.call_count(), 2);
        scheduler.stop().await;
    }

    #[tokio::test]
    async fn test_persistence_failure_keeps_in_memory_state() {
        let scheduler = Scheduler::new(
            MonitorConfig::new(Vec::new(), TEN_MINUTES),
            Arc::new(FakeProbe::new()),
            Arc::new(FailingGateway),
        );

        assert_eq!(scheduler.add_url("http://a").await.unwrap(), vec!["http://a"]);
        assert_eq!(scheduler.set_interval(2).await.unwrap(), 2 * MS_PER_MINUTE);
        assert!(scheduler.remove_url("http://a").await.is_empty());
        scheduler.stop().await;
    }

    #[tokio::test]
    async fn test_concurrent_adds() {
        let (scheduler, _, gateway) = scheduler_with(&[], TEN_MINUTES);
        let scheduler = Arc::new(scheduler);

        let mut handles = Vec::new();
        for i in 0..20 {
            let scheduler = Arc::clone(&scheduler);
            handles.push(tokio::spawn(async move {
                scheduler.add_url(&format!("http://host-{}", i % 10)).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let config = scheduler.config().await;
        assert_eq!(config.urls.len(), 10);
        assert_eq!(scheduler.snapshot().await.results.len(), 10);
        assert_eq!(gateway.stored().await.unwrap().urls.len(), 10);
    }

    /// Holds the first call open until released
    struct BlockingProbe {
        calls: AtomicUsize,
        release: Notify,
    }

    #[async_trait]
    impl Probe for BlockingProbe {
        async fn probe(&self, _url: &str) -> ProbeResult {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                self.release.notified().await;
            }
            ProbeResult::responded(200, 1)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_ticks_are_skipped() {
        let probe = Arc::new(BlockingProbe {
            calls: AtomicUsize::new(0),
            release: Notify::new(),
        });
        let scheduler = Scheduler::new(
            MonitorConfig::new(vec!["http://a".to_string()], MS_PER_MINUTE),
            probe.clone(),
            Arc::new(MemoryGateway::new()),
        );

        scheduler.start().await;
        advance(1).await;
        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);

        // First sweep is still blocked, so the next tick does nothing
        advance(MS_PER_MINUTE).await;
        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);

        // Rescheduling mid-sweep rearms the timer but its immediate sweep is skipped
        assert_eq!(scheduler.set_interval(2).await.unwrap(), 2 * MS_PER_MINUTE);
        advance(1).await;
        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
        assert!(scheduler.is_scheduled().await);

        probe.release.notify_one();
        advance(1).await;

        // No tick at the old one minute cadence
        advance(MS_PER_MINUTE).await;
        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);

        advance(MS_PER_MINUTE).await;
        assert_eq!(probe.calls.load(Ordering::SeqCst), 2);
        scheduler.stop().await;
    }
}
