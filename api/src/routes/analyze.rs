//! Image analysis endpoint.
//!
//! Accepts a base64-wrapped fundus photograph plus opaque patient
//! passthrough fields, runs the full analysis pipeline, and returns the
//! assembled report.

use async_trait::async_trait;
use axum::http::Method;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use fundus_values::{AnalysisReport, PatientInfo, RequestValue};

use crate::error::{ApiError, ApiResult};
use crate::route_trait::{RouteHandler, RouteMetadata, TestCase};
use crate::traits::AppStateProvider;

/// Request body for analysis.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// Base64-encoded image data (PNG or JPEG) at original resolution.
    #[schema(example = "<base64 PNG/JPEG data>")]
    pub image_b64: String,
    /// Patient name, passthrough only.
    #[serde(default)]
    pub patient_name: String,
    /// Patient email, passthrough only.
    #[serde(default)]
    pub email: String,
}

/// Analysis result payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeResponse {
    /// Always true on the success path.
    pub success: bool,
    /// The assembled analysis report.
    pub analysis: AnalysisReport,
}

/// Analysis route handler.
pub struct AnalyzeRoute;

#[async_trait]
impl RouteHandler for AnalyzeRoute {
    type Request = AnalyzeRequest;
    type Response = AnalyzeResponse;

    fn metadata() -> RouteMetadata {
        RouteMetadata {
            path: "/v1/analyze",
            method: Method::POST,
            tags: &["Analysis"],
            description: "Analyze a fundus photograph for diabetic retinopathy",
            idempotent: false,
            requires_auth: false,
        }
    }

    async fn validate_request(req: &Self::Request) -> ApiResult<()> {
        if req.image_b64.trim().is_empty() {
            return Err(ApiError::ValidationError {
                field: "image_b64".to_string(),
                message: "image data cannot be empty".to_string(),
                request_id: None,
            });
        }
        Ok(())
    }

    async fn handle<S>(req: Self::Request, state: &S) -> ApiResult<Self::Response>
    where
        S: AppStateProvider + Send + Sync,
    {
        let request_id = uuid::Uuid::new_v4();

        tracing::info!(
            request_id = %request_id,
            upload_len = req.image_b64.len(),
            "analysis request received"
        );

        let image = STANDARD
            .decode(req.image_b64.trim())
            .map_err(|e| ApiError::ValidationError {
                field: "image_b64".to_string(),
                message: format!("not valid base64: {}", e),
                request_id: Some(request_id.to_string()),
            })?;

        let patient = PatientInfo::new(req.patient_name, req.email);
        let response = state
            .handle_request(RequestValue::analyze(image, patient))
            .await
            .map_err(|e| {
                let api_err = ApiError::from(e);
                tracing::warn!(request_id = %request_id, error = %api_err, "analysis failed");
                api_err
            })?;

        let report = response.as_analysis().cloned().ok_or_else(|| {
            ApiError::InternalError("backend returned a non-analysis response".to_string())
        })?;

        tracing::info!(
            request_id = %request_id,
            stage = %report.stage,
            lesion_count = report.lesion_count,
            "analysis completed"
        );

        Ok(AnalyzeResponse {
            success: true,
            analysis: report,
        })
    }

    fn test_cases() -> Vec<TestCase<Self::Request>> {
        vec![
            TestCase::failure(
                "empty_image_is_rejected",
                AnalyzeRequest {
                    image_b64: String::new(),
                    patient_name: String::new(),
                    email: String::new(),
                },
            ),
            TestCase::failure(
                "whitespace_image_is_rejected",
                AnalyzeRequest {
                    image_b64: "   ".to_string(),
                    patient_name: String::new(),
                    email: String::new(),
                },
            ),
        ]
    }
}
