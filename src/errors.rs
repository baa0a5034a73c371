//! Error types for the pinger

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PingerError>;

#[derive(Debug, Error)]
pub enum PingerError {
    /// Caller supplied a malformed interval or URL
    #[error("{0}")]
    InvalidInput(String),

    /// Configuration gateway could not load or save
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PingerError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        PingerError::InvalidInput(msg.into())
    }
}

impl ResponseError for PingerError {
    fn status_code(&self) -> StatusCode {
        match self {
            PingerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_maps_to_bad_request() {
        let err = PingerError::invalid_input("Invalid interval value");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid interval value");
    }

    #[test]
    fn test_other_errors_map_to_server_error() {
        let err = PingerError::Persistence("disk full".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Persistence error: disk full");
    }
}
