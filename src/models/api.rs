//! Request and response bodies for the status API

use serde::{Deserialize, Serialize};

use crate::models::ProbeResult;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlStat {
    pub url: String,
    pub last_status: ProbeResult,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub monitored: usize,
    pub stats: Vec<UrlStat>,
    pub is_pinging: bool,
    pub ping_interval: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalResponse {
    pub success: bool,
    pub ping_interval: u64,
}

#[derive(Debug, Serialize)]
pub struct UrlsResponse {
    pub success: bool,
    pub urls: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub success: bool,
    pub is_pinging: bool,
}

#[derive(Debug, Deserialize)]
pub struct AddUrlRequest {
    pub url: Option<String>,
}
