//! Application error taxonomy and its HTTP representation.
//!
//! Every operation of the [`Registry`](crate::application::services::Registry)
//! returns [`AppError`]. Handlers hand it straight back to axum, which renders it
//! through [`IntoResponse`].

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::repositories::StoreError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or missing request data.
    #[error("{message}")]
    InvalidInput { message: String, details: Value },

    /// No record for the given key.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// Store unreachable, constraint failure or any other backend failure.
    #[error("{message}")]
    Storage { message: String, details: Value },

    /// The randomness source failed while deriving a token.
    #[error("{message}")]
    Generation { message: String, details: Value },

    /// A store call exceeded its deadline.
    #[error("{message}")]
    Timeout { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidInput {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn storage(message: impl Into<String>, details: Value) -> Self {
        Self::Storage {
            message: message.into(),
            details,
        }
    }

    pub fn generation(message: impl Into<String>, details: Value) -> Self {
        Self::Generation {
            message: message.into(),
            details,
        }
    }

    pub fn timeout(message: impl Into<String>, details: Value) -> Self {
        Self::Timeout {
            message: message.into(),
            details,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Storage { .. } | AppError::Generation { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Converts the error into the payload sent to clients.
    ///
    /// Server-side failures are reduced to a generic message; their details only
    /// ever reach the log.
    pub fn to_error_info(&self) -> ErrorInfo {
        match self {
            AppError::InvalidInput { message, details } => ErrorInfo {
                code: "validation_error",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::NotFound { message, details } => ErrorInfo {
                code: "not_found",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::Storage { .. } | AppError::Generation { .. } => ErrorInfo {
                code: "internal_error",
                message: "An error occurred".to_string(),
                details: json!({}),
            },
            AppError::Timeout { .. } => ErrorInfo {
                code: "timeout",
                message: "The request timed out".to_string(),
                details: json!({}),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        let details = match &e {
            StoreError::UniqueViolation { constraint } => json!({ "constraint": constraint }),
            StoreError::Unavailable(reason) | StoreError::Backend(reason) => {
                json!({ "reason": reason })
            }
        };

        AppError::storage(e.to_string(), details)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let errors = e.field_errors();
        let mut fields: Vec<&str> = errors.keys().map(|k| k.as_ref()).collect();
        fields.sort_unstable();

        AppError::bad_request("Invalid request body", json!({ "fields": fields }))
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::bad_request("Invalid request body", json!({ "reason": e.body_text() }))
    }
}

impl From<PathRejection> for AppError {
    fn from(e: PathRejection) -> Self {
        AppError::bad_request("Invalid path", json!({ "reason": e.body_text() }))
    }
}
