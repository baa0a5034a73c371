pub mod api;
pub mod monitor;
pub mod probe;

pub use monitor::{MonitorConfig, StoredConfig};
pub use probe::{ProbeResult, ProbeStatus};
