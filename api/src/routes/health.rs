//! Health check endpoint.
//!
//! A pure read of the model registry state: `healthy` once all models are
//! loaded, `unhealthy` while loading or after a load failure. Used by
//! deployment health probes and by clients deciding whether to retry a 503.

use async_trait::async_trait;
use axum::http::Method;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use fundus_values::{HealthStatus, RequestValue};

use crate::error::{ApiError, ApiResult};
use crate::route_trait::{RouteHandler, RouteMetadata, TestCase};
use crate::traits::AppStateProvider;

/// Health check request (empty for GET endpoint).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRequest;

/// Health check response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status: "healthy" or "unhealthy".
    pub status: HealthStatus,
    /// Whether the model registry reached the ready state.
    pub models_loaded: bool,
}

/// Health check route handler.
pub struct HealthRoute;

#[async_trait]
impl RouteHandler for HealthRoute {
    type Request = HealthRequest;
    type Response = HealthResponse;

    fn metadata() -> RouteMetadata {
        RouteMetadata {
            path: "/health",
            method: Method::GET,
            tags: &["System"],
            description: "Readiness probe reporting whether the analysis models are loaded",
            idempotent: true,
            requires_auth: false,
        }
    }

    async fn validate_request(_req: &Self::Request) -> ApiResult<()> {
        // No parameters to validate.
        Ok(())
    }

    async fn handle<S>(_req: Self::Request, state: &S) -> ApiResult<Self::Response>
    where
        S: AppStateProvider + Send + Sync,
    {
        let request_id = uuid::Uuid::new_v4();

        tracing::debug!(request_id = %request_id, "health check request received");

        let response = state
            .handle_request(RequestValue::health())
            .await
            .map_err(ApiError::from)?;

        let (status, models_loaded) = response
            .as_health()
            .ok_or_else(|| ApiError::InternalError("backend returned a non-health response".to_string()))?;

        tracing::debug!(
            request_id = %request_id,
            models_loaded,
            "health check completed"
        );

        Ok(HealthResponse {
            status,
            models_loaded,
        })
    }

    fn test_cases() -> Vec<TestCase<Self::Request>> {
        vec![TestCase::success("health_check_basic", HealthRequest)]
    }
}
