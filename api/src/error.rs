//! Error types for the API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use fundus_values::AnalysisError;

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// API error types following RFC 7807 Problem Details.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400) - malformed request.
    BadRequest(String),

    /// Validation error (400) - specific field validation failed.
    ValidationError {
        /// The field that failed validation.
        field: String,
        /// The validation error message.
        message: String,
        /// Optional request ID for tracking.
        request_id: Option<String>,
    },

    /// Internal server error (500).
    InternalError(String),

    /// Service unavailable (503) - models not loaded.
    ServiceUnavailable(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            Self::ValidationError { field, message, .. } => {
                write!(f, "Validation Error [field: {}]: {}", field, message)
            }
            Self::InternalError(msg) => write!(f, "Internal Error: {}", msg),
            Self::ServiceUnavailable(msg) => write!(f, "Service Unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// RFC 7807 Problem Details response.
#[derive(Debug, Serialize, Deserialize)]
struct ProblemDetails {
    /// URI reference identifying the problem type.
    #[serde(rename = "type")]
    type_uri: String,

    /// Short, human-readable summary.
    title: String,

    /// HTTP status code.
    status: u16,

    /// Human-readable explanation.
    detail: String,

    /// Request ID for tracing.
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, title, detail, request_id) = match &self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Bad Request", msg.clone(), None),
            Self::ValidationError {
                field,
                message,
                request_id,
            } => (
                StatusCode::BAD_REQUEST,
                "Validation Error",
                format!("Field '{}': {}", field, message),
                request_id.clone(),
            ),
            Self::InternalError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                msg.clone(),
                None,
            ),
            Self::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Service Unavailable",
                msg.clone(),
                None,
            ),
        };

        let problem = ProblemDetails {
            type_uri: format!(
                "https://fundus-ai.dev/errors/{}",
                title.to_lowercase().replace(' ', "-")
            ),
            title: title.to_string(),
            status: status.as_u16(),
            detail,
            request_id,
        };

        (status, Json(problem)).into_response()
    }
}

/// Convert [`AnalysisError`] to [`ApiError`].
///
/// This is the primary error mapping from backend to API layer. The three
/// caller-distinguishable failure classes map to distinct status codes:
/// not-ready to 503, invalid input to 400, stage failures to 500.
impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::NotReady => ApiError::ServiceUnavailable(
                "analysis service is not ready: models are not loaded. Retry once GET /health reports healthy".to_string(),
            ),
            AnalysisError::InvalidInput { reason } => {
                ApiError::BadRequest(format!("invalid input image: {}", reason))
            }
            AnalysisError::StageFailure { stage, source } => ApiError::InternalError(format!(
                "analysis failed: {} stage error: {}",
                stage, source
            )),
            AnalysisError::Assembly { reason } => {
                ApiError::InternalError(format!("analysis failed: {}", reason))
            }
        }
    }
}

/// Convert `anyhow::Error` to [`ApiError`].
///
/// Tries to downcast to the typed [`AnalysisError`] first; anything else is
/// an internal error.
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<AnalysisError>() {
            Ok(analysis_err) => ApiError::from(analysis_err),
            Err(other) => ApiError::InternalError(other.to_string()),
        }
    }
}
