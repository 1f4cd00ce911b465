//! Task service error types

use thiserror::Error;

/// Why a task service call produced no usable answer
#[derive(Debug, Error)]
pub enum TaskApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed task list: {0}")]
    Body(#[from] serde_json::Error),
}
