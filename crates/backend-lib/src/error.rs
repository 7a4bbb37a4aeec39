// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use metrics::counter;
use thiserror::Error;

use crate::events::{EventPublisher, AUDIT};
use crate::storage::StorageError;
use crate::telemetry::STORAGE_FAULT;

/// Application error taxonomy surfaced to HTTP callers
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Authentication failed: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage fault: {0}")]
    StorageFault(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // Duplicate registrations are reported as a client error, like malformed input.
            AppError::InvalidInput(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StorageFault(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "VAL_001",
            AppError::Unauthenticated(_) => "AUTH_001",
            AppError::Forbidden(_) => "AUTH_002",
            AppError::Conflict(_) => "ACC_001",
            AppError::NotFound(_) => "NF_001",
            AppError::StorageFault(_) => "STORE_001",
            AppError::Internal(_) => "INT_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::InvalidInput(_) => "Invalid input provided".to_string(),
            AppError::Unauthenticated(_) => "Authentication failed".to_string(),
            AppError::Forbidden(_) => "Administrator privileges required".to_string(),
            AppError::Conflict(_) => "Account already exists".to_string(),
            AppError::NotFound(_) => "Resource not found".to_string(),
            AppError::StorageFault(_) | AppError::Internal(_) => {
                "An internal server error occurred".to_string()
            },
        }
    }

    /// Message sent to the caller. Storage detail never leaves the process.
    pub fn public_message(&self) -> String {
        match self {
            AppError::StorageFault(_) | AppError::Internal(_) => self.sanitized_message(),
            _ if cfg!(debug_assertions) => self.to_string(),
            _ => self.sanitized_message(),
        }
    }

    pub fn invalid_credentials() -> Self {
        AppError::Unauthenticated("invalid username or password".to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.public_message(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Duplicate(username) => {
                AppError::Conflict(format!("username {username} is already registered"))
            },
            StorageError::UnknownDisplay(id) => {
                AppError::InvalidInput(format!("display {id} does not exist"))
            },
            other => AppError::StorageFault(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("blocking task failed: {err}"))
    }
}

/// Map a store failure for `operation`; real faults are logged, counted and
/// sent to the audit channel before being returned.
pub(crate) fn report_storage_error(
    err: StorageError,
    operation: &'static str,
    events: &dyn EventPublisher,
) -> AppError {
    let app_err = AppError::from(err);
    if let AppError::StorageFault(detail) = &app_err {
        tracing::error!(operation, error = %detail, "storage fault");
        counter!(STORAGE_FAULT).increment(1);
        events.publish(AUDIT, format!("storage fault during {operation}: {detail}"));
    }
    app_err
}
