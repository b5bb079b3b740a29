//! Request-level error type and its JSON rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blog::editor::EditorError;
use crate::db::DataError;
use crate::storage::StorageError;

/// Error body shared by every JSON endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authorization required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Admin role required")]
    Forbidden,

    #[error("Too many requests. Please try again later.")]
    RateLimited,

    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("{0}")]
    Internal(String),
}

impl From<EditorError> for AppError {
    fn from(err: EditorError) -> Self {
        match err {
            EditorError::Validation(msg) => AppError::Validation(msg),
            EditorError::Data(e) => AppError::Data(e),
            EditorError::Storage(e) => AppError::Storage(e),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidToken | AppError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::NotFound | AppError::Data(DataError::NotFound { .. }) => {
                StatusCode::NOT_FOUND
            }
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(StorageError::Rejected(_) | StorageError::InvalidPath(_)) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Storage(StorageError::AlreadyExists(_))
            | AppError::Data(DataError::Duplicate { .. }) => StatusCode::CONFLICT,
            AppError::Data(_)
            | AppError::Storage(StorageError::Io(_))
            | AppError::Template(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text shown to the user; server-side details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Data(DataError::NotFound { .. }) => "Not found".to_string(),
            AppError::Data(DataError::Duplicate { column, .. }) => {
                format!("A record with this {} already exists", column)
            }
            AppError::Data(_) => "Database error".to_string(),
            AppError::Storage(StorageError::Io(_)) => "Failed to store file".to_string(),
            AppError::Template(_) | AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.public_message(),
                message: None,
            }),
        )
            .into_response()
    }
}
