//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::TimetableError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error)
    BadRequest(String),
    /// Internal server error
    Internal(String),
    /// Timetable loading or parsing error
    Timetable(TimetableError),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ApiError) {
        match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg)),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Timetable(err) => {
                let (status, code, message) = match &err {
                    TimetableError::LoadFailure { message, .. } => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "LOAD_FAILURE", message)
                    }
                    TimetableError::UnsupportedFormat { message, .. } => {
                        (StatusCode::BAD_REQUEST, "UNSUPPORTED_FORMAT", message)
                    }
                    TimetableError::InvalidLayout { message, .. } => {
                        (StatusCode::BAD_REQUEST, "INVALID_LAYOUT", message)
                    }
                    TimetableError::ConfigurationError { message, .. } => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR", message)
                    }
                    TimetableError::InternalError { message, .. } => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
                    }
                };
                let mut body = ApiError::new(code, message.clone());
                let context = err.context().to_string();
                if !context.is_empty() {
                    body = body.with_details(context);
                }
                (status, body)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_body();
        if status.is_server_error() {
            tracing::error!(code = %error.code, message = %error.message, "request failed");
        } else {
            tracing::debug!(code = %error.code, message = %error.message, "request rejected");
        }

        (status, Json(error)).into_response()
    }
}

impl From<TimetableError> for AppError {
    fn from(err: TimetableError) -> Self {
        AppError::Timetable(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorContext;

    #[test]
    fn test_load_failure_maps_to_500_with_details() {
        let err = AppError::from(TimetableError::load_with_context(
            "No such file",
            ErrorContext::new("load_sheet").with_source("week.xlsx"),
        ));
        let (status, body) = err.status_and_body();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "LOAD_FAILURE");
        assert_eq!(body.message, "No such file");
        assert_eq!(
            body.details.as_deref(),
            Some("[operation=load_sheet, source=week.xlsx]")
        );
    }

    #[test]
    fn test_layout_errors_map_to_400() {
        let (status, body) =
            AppError::from(TimetableError::invalid_layout("bad cell")).status_and_body();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "INVALID_LAYOUT");
        assert!(body.details.is_none());

        let (status, _) =
            AppError::from(TimetableError::unsupported_format("pdf")).status_and_body();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
