use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// Outcome of the most recent probe against a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    /// The endpoint answered with this HTTP status code (any code, 5xx included)
    Ok(u16),
    /// Transport-level failure: refused, timed out, DNS, bad URL
    Down,
    /// Never probed
    Unknown,
}

impl ProbeStatus {
    pub fn is_down(&self) -> bool {
        matches!(self, ProbeStatus::Down)
    }
}

// Dashboards read the numeric code, or the "DOWN"/"UNKNOWN" labels.
impl Serialize for ProbeStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ProbeStatus::Ok(code) => serializer.serialize_u16(*code),
            ProbeStatus::Down => serializer.serialize_str("DOWN"),
            ProbeStatus::Unknown => serializer.serialize_str("UNKNOWN"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    pub status: ProbeStatus,
    #[serde(rename = "responseTime")]
    pub response_time_ms: Option<u64>,
    #[serde(rename = "time")]
    pub observed_at: DateTime<Utc>,
}

impl ProbeResult {
    pub fn responded(code: u16, response_time_ms: u64) -> Self {
        Self {
            status: ProbeStatus::Ok(code),
            response_time_ms: Some(response_time_ms),
            observed_at: Utc::now(),
        }
    }

    pub fn down() -> Self {
        Self {
            status: ProbeStatus::Down,
            response_time_ms: None,
            observed_at: Utc::now(),
        }
    }

    pub fn unknown() -> Self {
        Self {
            status: ProbeStatus::Unknown,
            response_time_ms: None,
            observed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_value(ProbeStatus::Ok(503)).unwrap(), json!(503));
        assert_eq!(serde_json::to_value(ProbeStatus::Down).unwrap(), json!("DOWN"));
        assert_eq!(serde_json::to_value(ProbeStatus::Unknown).unwrap(), json!("UNKNOWN"));
    }

    #[test]
    fn test_result_field_names() {
        let value = serde_json::to_value(ProbeResult::responded(200, 42)).unwrap();
        assert_eq!(value["status"], json!(200));
        assert_eq!(value["responseTime"], json!(42));
        assert!(value["time"].is_string());

        let value = serde_json::to_value(ProbeResult::down()).unwrap();
        assert_eq!(value["responseTime"], serde_json::Value::Null);
    }
}
