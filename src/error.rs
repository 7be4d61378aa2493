//! Application error type and its HTTP mapping.
//!
//! Every failure the service can report is a variant of [`AppError`]. Errors are
//! returned at the point of detection and translated 1:1 into a status code at
//! the HTTP boundary; nothing in the core retries.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use validator::ValidationErrors;

/// JSON body returned for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed request body or parameters (missing url, bad validity, ...).
    #[error("{message}")]
    InvalidRequest { message: String, details: Value },

    #[error("Invalid URL format")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid shortcode format. Must be 3-20 alphanumeric characters")]
    InvalidShortcodeFormat { shortcode: String },

    #[error("Custom shortcode already exists")]
    ShortcodeConflict { shortcode: String },

    #[error("Shortcode not found")]
    NotFound { shortcode: String },

    #[error("Short URL has expired")]
    Expired {
        shortcode: String,
        expired_at: DateTime<Utc>,
    },

    /// Random code generation collided on every allowed attempt.
    #[error("Failed to generate a unique shortcode")]
    CodespaceExhausted { attempts: usize },

    #[error("Route not found")]
    RouteNotFound { path: String },

    /// Opaque catch-all. `message` is logged, never sent to the client.
    #[error("Internal server error")]
    Internal { message: String },
}

impl AppError {
    pub fn invalid_request(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidRequest {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest { .. }
            | Self::InvalidUrl { .. }
            | Self::InvalidShortcodeFormat { .. } => StatusCode::BAD_REQUEST,
            Self::ShortcodeConflict { .. } => StatusCode::CONFLICT,
            Self::NotFound { .. } | Self::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Expired { .. } => StatusCode::GONE,
            Self::CodespaceExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code included in the response body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "invalid_request",
            Self::InvalidUrl { .. } => "invalid_url",
            Self::InvalidShortcodeFormat { .. } => "invalid_shortcode_format",
            Self::ShortcodeConflict { .. } => "shortcode_conflict",
            Self::NotFound { .. } => "not_found",
            Self::Expired { .. } => "expired",
            Self::CodespaceExhausted { .. } => "codespace_exhausted",
            Self::RouteNotFound { .. } => "route_not_found",
            Self::Internal { .. } => "internal_error",
        }
    }

    pub fn to_error_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
            code: self.code(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal { message } => tracing::error!("Internal error: {}", message),
            Self::CodespaceExhausted { attempts } => {
                tracing::error!("Shortcode space exhausted after {} attempts", attempts)
            }
            Self::InvalidRequest { details, .. } if !details.is_null() => {
                tracing::debug!(details = %details, "Rejected request: {}", self)
            }
            _ => tracing::debug!("Request failed: {}", self),
        }

        (self.status_code(), Json(self.to_error_body())).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .iter()
            .flat_map(|(_, errs)| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid request".to_string());

        let details: serde_json::Map<String, Value> = fields
            .iter()
            .map(|(field, errs)| {
                let codes: Vec<&str> = errs.iter().map(|e| e.code.as_ref()).collect();
                (field.to_string(), json!(codes))
            })
            .collect();

        Self::InvalidRequest {
            message,
            details: Value::Object(details),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest {
            message: "Invalid JSON body".to_string(),
            details: json!({ "reason": rejection.body_text() }),
        }
    }
}
