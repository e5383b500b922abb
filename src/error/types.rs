// src/error/types.rs
use crate::domain::DomainError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Other error: {0}")]
    Other(String),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        AppError::Other(format!("Date parse error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;

// ============================================================================
// FETCH FAILURE (crosses the core boundary as a value, never as an Err)
// ============================================================================

/// Broad category of a failed remote interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Connection refused, timeout, DNS
    Network,
    /// 5xx
    Server,
    /// 404
    NotFound,
    /// Response body did not match the expected shape
    Decode,
    /// 4xx other than 404 (bad request, forbidden, conflict)
    Rejected,
    Internal,
}

/// A failed fetch or mutation, as delivered back into the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Network, message)
    }
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl From<AppError> for FetchFailure {
    fn from(err: AppError) -> Self {
        let kind = match &err {
            AppError::Http(e) if e.is_decode() => FailureKind::Decode,
            AppError::Http(e) => match e.status() {
                Some(status) if status.as_u16() == 404 => FailureKind::NotFound,
                Some(status) if status.is_server_error() => FailureKind::Server,
                Some(status) if status.is_client_error() => FailureKind::Rejected,
                _ => FailureKind::Network,
            },
            AppError::Api { status: 404, .. } | AppError::NotFound => FailureKind::NotFound,
            AppError::Api { status, .. } if *status >= 500 => FailureKind::Server,
            AppError::Api { .. } => FailureKind::Rejected,
            AppError::Serialization(_) | AppError::Domain(_) => FailureKind::Decode,
            AppError::Io(_) | AppError::Config(_) | AppError::Other(_) => FailureKind::Internal,
        };
        FetchFailure::new(kind, err.to_string())
    }
}
