//! URL Pinger Library
//!
//! Keeps a list of HTTP endpoints, probes them on a recurring schedule and
//! exposes the latest result for each through a small JSON API.

pub mod config;
pub mod controllers;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod store;

pub use config::Settings;
pub use errors::{PingerError, Result};
pub use models::{MonitorConfig, ProbeResult, ProbeStatus, StoredConfig};
pub use services::gateway::{ConfigGateway, FileGateway, MemoryGateway};
pub use services::prober::{HttpProber, Probe};
pub use services::scheduler::Scheduler;
pub use state::AppState;
pub use store::StatusStore;
