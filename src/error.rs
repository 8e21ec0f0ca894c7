//! Error types for the Lost-and-Found client

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error body returned by the backend (`{"error": "..."}`)
#[derive(Debug, Deserialize)]
pub struct BackendErrorBody {
    pub error: Option<String>,
}

/// Error response body produced by the development server
#[derive(Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub error: String,
    pub message: String,
}

/// What the UI should do with a failed call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    RedirectToLogin,
    AccessDenied(String),
    Inline(String),
}

pub const CONNECTIVITY_MESSAGE: &str =
    "Unable to reach the server. Please check your connection and try again.";

impl AppError {
    /// Map an HTTP status and raw body to an error, preferring the server's message
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let server_message = serde_json::from_slice::<BackendErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.trim().is_empty());
        let message = server_message.unwrap_or_default();

        match status {
            400 => AppError::Validation(message),
            401 => AppError::Authentication(message),
            403 => AppError::Authorization(message),
            404 => AppError::NotFound(message),
            409 => AppError::Conflict(message),
            _ => AppError::Server { status, message },
        }
    }

    /// HTTP status this error came from, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Authentication(_) => Some(401),
            AppError::Authorization(_) => Some(403),
            AppError::NotFound(_) => Some(404),
            AppError::Conflict(_) => Some(409),
            AppError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, AppError::Authentication(_))
    }

    /// Server-provided message, if the error carries a non-empty one
    pub fn server_message(&self) -> Option<&str> {
        let msg = match self {
            AppError::Authentication(m)
            | AppError::Authorization(m)
            | AppError::NotFound(m)
            | AppError::Validation(m)
            | AppError::Conflict(m)
            | AppError::BusinessRule(m) => m.as_str(),
            AppError::Server { message, .. } => message.as_str(),
            _ => return None,
        };
        if msg.is_empty() {
            None
        } else {
            Some(msg)
        }
    }

    /// Message to show the user: the server's message, else `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AppError::Network(_) => CONNECTIVITY_MESSAGE.to_string(),
            _ => self
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        }
    }

    /// Classify the error into the UI reaction
    pub fn ui_action(&self, fallback: &str) -> UiAction {
        match self {
            AppError::Authentication(_) => UiAction::RedirectToLogin,
            AppError::Authorization(_) => UiAction::AccessDenied(
                self.server_message()
                    .unwrap_or("Access denied. Staff access required.")
                    .to_string(),
            ),
            _ => UiAction::Inline(self.user_message(fallback)),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AppError::Decode(e.to_string())
        } else {
            AppError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Decode(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(crate::models::first_validation_message(&errors))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Network(msg) => {
                tracing::error!("Upstream unreachable: {}", msg);
                StatusCode::BAD_GATEWAY
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            other => other
                .status()
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::BAD_REQUEST),
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            error: status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
