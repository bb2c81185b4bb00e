use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use vital_track_domain::services::{ReadingServiceError, ReportError};

/// Error response format for API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            details: None,
        }
    }

    /// Create a not found error response
    pub fn not_found(resource: &str) -> Self {
        Self::new("not_found", format!("The requested {} could not be found", resource))
    }

    /// Create a validation error response
    pub fn validation_error(message: &str, details: Option<serde_json::Value>) -> Self {
        Self {
            details,
            ..Self::new("validation_error", message)
        }
    }

    /// Create a bad request error response
    pub fn bad_request(message: &str) -> Self {
        Self::new("bad_request", message)
    }

    /// There is nothing to report or export for the request
    pub fn no_data(message: &str) -> Self {
        Self::new("no_data", message)
    }

    /// Create an internal error response
    pub fn internal_error() -> Self {
        Self::new("internal_error", "An unexpected error occurred")
    }

    pub fn status_code(&self) -> StatusCode {
        match self.error.as_str() {
            "not_found" | "no_data" => StatusCode::NOT_FOUND,
            "validation_error" | "bad_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

impl From<ReadingServiceError> for ErrorResponse {
    fn from(err: ReadingServiceError) -> Self {
        match err {
            ReadingServiceError::ValidationError(message) => Self::validation_error(&message, None),
            ReadingServiceError::NotFound(_) => Self::not_found("reading"),
            ReadingServiceError::Report(ReportError::NoMetricsSelected) => {
                Self::bad_request(&ReportError::NoMetricsSelected.to_string())
            }
            ReadingServiceError::Report(ReportError::Csv(message)) => {
                error!("CSV export failed: {}", message);
                Self::internal_error()
            }
            ReadingServiceError::Report(report_error) => Self::no_data(&report_error.to_string()),
            ReadingServiceError::RepositoryError(message) => {
                error!("Reading store failure: {}", message);
                Self::internal_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_map_to_status_codes() {
        let cases = vec![
            (ReadingServiceError::ValidationError("bad".to_string()), StatusCode::BAD_REQUEST),
            (ReadingServiceError::NotFound("7".to_string()), StatusCode::NOT_FOUND),
            (ReadingServiceError::Report(ReportError::NoMetricsSelected), StatusCode::BAD_REQUEST),
            (ReadingServiceError::Report(ReportError::NoData), StatusCode::NOT_FOUND),
            (ReadingServiceError::Report(ReportError::NothingToExport), StatusCode::NOT_FOUND),
            (ReadingServiceError::Report(ReportError::Csv("bad".to_string())), StatusCode::INTERNAL_SERVER_ERROR),
            (ReadingServiceError::RepositoryError("down".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            let response: ErrorResponse = err.into();
            assert_eq!(response.status_code(), expected, "{:?}", response);
        }
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let response: ErrorResponse = ReadingServiceError::RepositoryError("disk I/O error".to_string()).into();
        assert_eq!(response.error, "internal_error");
        assert!(!response.message.contains("disk"));
    }
}
