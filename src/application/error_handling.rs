// src/application/error_handling.rs
//
// Failure → user-facing status mapping
//
// ARCHITECTURE:
// - Maps transport failures → readable status for the UI
// - Never exposes raw transport internals as the headline
// - Logs the full failure for debugging

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, FailureKind, FetchFailure};

/// Error categories for the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Could not reach the server
    Connection,

    /// Server answered with an error
    Server,

    /// The thing asked for does not exist
    NotFound,

    /// The server refused the change
    Rejected,

    /// Nothing matched the chosen source
    EmptyResult,

    Internal,
}

/// A readable status shown in error views and notices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
}

impl StatusMessage {
    /// Status for a failed fetch or mutation; `context` says what was attempted
    pub fn from_failure(context: &str, failure: &FetchFailure) -> Self {
        warn!("{} failed: {}", context, failure);

        let (error_type, headline) = match failure.kind {
            FailureKind::Network => (ErrorType::Connection, "Could not reach the server"),
            FailureKind::Server => (ErrorType::Server, "The server reported an error"),
            FailureKind::NotFound => (ErrorType::NotFound, "Not found on the server"),
            FailureKind::Rejected => (ErrorType::Rejected, "The server rejected the request"),
            FailureKind::Decode => (ErrorType::Server, "Unexpected response from the server"),
            FailureKind::Internal => (ErrorType::Internal, "Something went wrong"),
        };

        Self {
            error_type,
            message: format!("{}: {}", context, headline),
            details: Some(failure.message.clone()),
        }
    }

    pub fn from_app_error(context: &str, error: AppError) -> Self {
        Self::from_failure(context, &FetchFailure::from(error))
    }

    pub fn empty_result(source_label: &str) -> Self {
        Self {
            error_type: ErrorType::EmptyResult,
            message: format!("No assets found for {}", source_label),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            error_type: ErrorType::Internal,
            message: message.into(),
            details: None,
        }
    }
}

impl std::fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{} ({})", self.message, details),
            None => write!(f, "{}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_failure_maps_to_connection() {
        let status = StatusMessage::from_failure("Loading timeline", &FetchFailure::network("connection refused"));
        assert_eq!(status.error_type, ErrorType::Connection);
        assert_eq!(status.message, "Loading timeline: Could not reach the server");
        assert_eq!(status.details.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_app_error_goes_through_classification() {
        let status = StatusMessage::from_app_error("Creating album", AppError::Api {
            status: 400,
            message: "duplicate name".to_string(),
        });
        assert_eq!(status.error_type, ErrorType::Rejected);
    }

    #[test]
    fn test_serialization() {
        let status = StatusMessage::empty_result("album Trips");
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("empty_result"));
        assert!(json.contains("No assets found for album Trips"));
    }
}
