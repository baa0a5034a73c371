//! One sequential pass over the monitored URLs

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::services::prober::Probe;
use crate::state::MonitorState;

/// Counts from a completed sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub probed: usize,
    pub responded: usize,
    pub down: usize,
    pub elapsed: Duration,
}

/// Probe every URL in the current set, one at a time, recording each result
/// as soon as it completes.
///
/// Returns `None` without probing anything when pinging is paused. The URL set
/// is copied before the first probe; additions made while the sweep runs wait
/// for the next sweep, and results for URLs removed mid-sweep are discarded.
pub async fn run_sweep(state: &Mutex<MonitorState>, probe: &dyn Probe) -> Option<SweepSummary> {
    let urls = {
        let state = state.lock().await;
        if !state.config.is_pinging {
            debug!("Pinging paused, skipping sweep");
            return None;
        }
        state.tracked_urls()
    };

    info!("Pinging {} URLs", urls.len());
    let start_time = Instant::now();
    let mut summary = SweepSummary::default();

    for (url, generation) in &urls {
        let result = probe.probe(url).await;

        summary.probed += 1;
        if result.status.is_down() {
            summary.down += 1;
        } else {
            summary.responded += 1;
        }

        let mut state = state.lock().await;
        if !state.record(url, *generation, result) {
            debug!("{} was removed during the sweep, discarding result", url);
        }
    }

    summary.elapsed = start_time.elapsed();

    let interval_ms = state.lock().await.config.ping_interval_ms;
    if summary.elapsed > Duration::from_millis(interval_ms) {
        warn!(
            "Sweep over {} URLs took {}ms, longer than the {}ms ping interval",
            summary.probed,
            summary.elapsed.as_millis(),
            interval_ms
        );
    }

    info!(
        "Sweep complete - {} probed, {} responded, {} down in {}ms",
        summary.probed,
        summary.responded,
        summary.down,
        summary.elapsed.as_millis()
    );

    Some(summary)
}
