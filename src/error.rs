use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::domain::entities::StatusTransitionError;
use crate::domain::identifier::IdentifierError;
use crate::utils::db_error::is_unique_violation_on_pr_id;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Wire shape of an error, `{"code", "message", "details"}`.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },
    #[error("{message}")]
    NotFound { message: String, details: Value },
    #[error("{message}")]
    Unauthorized { message: String, details: Value },
    #[error("{message}")]
    Conflict { message: String, details: Value },
    /// Another writer claimed the identifier this request computed.
    #[error("{message}")]
    RetryAllocation { message: String, details: Value },
    /// Stored data violates an invariant (e.g. a malformed `pr_id`).
    #[error("{message}")]
    DataIntegrity { message: String, details: Value },
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
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
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn retry_allocation(message: impl Into<String>, details: Value) -> Self {
        Self::RetryAllocation {
            message: message.into(),
            details,
        }
    }
    pub fn data_integrity(message: impl Into<String>, details: Value) -> Self {
        Self::DataIntegrity {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Conflict { .. } | AppError::RetryAllocation { .. } => StatusCode::CONFLICT,
            AppError::DataIntegrity { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::Unauthorized { message, details } => ("unauthorized", message, details),
            AppError::Conflict { message, details } => ("conflict", message, details),
            AppError::RetryAllocation { message, details } => {
                ("retry_allocation", message, details)
            }
            AppError::DataIntegrity { message, details } => {
                ("data_integrity_error", message, details)
            }
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        ErrorInfo {
            code,
            message: message.clone(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if is_unique_violation_on_pr_id(&e) {
            return AppError::retry_allocation(
                "Press release identifier was taken concurrently, retry allocation",
                json!({ "constraint": "press_releases_pr_id_key" }),
            );
        }

        if let Some(db) = e.as_database_error() {
            if db.is_unique_violation() {
                return AppError::conflict(
                    "Unique constraint violation",
                    json!({ "constraint": db.constraint() }),
                );
            }
            if db.is_foreign_key_violation() {
                return AppError::bad_request(
                    "Referenced record does not exist",
                    json!({ "constraint": db.constraint() }),
                );
            }
        }

        tracing::error!(error = %e, "Database error");
        AppError::internal("Database error", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Validation failed", details)
    }
}

impl From<IdentifierError> for AppError {
    fn from(e: IdentifierError) -> Self {
        tracing::error!(error = %e, "Stored press release identifier is corrupt");
        AppError::data_integrity(e.to_string(), json!({}))
    }
}

impl From<StatusTransitionError> for AppError {
    fn from(e: StatusTransitionError) -> Self {
        AppError::bad_request(
            e.to_string(),
            json!({ "from": e.from.as_str(), "to": e.to.as_str() }),
        )
    }
}
