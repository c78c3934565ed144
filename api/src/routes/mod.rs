//! API route handlers.

pub mod analyze;
pub mod health;

use utoipa::OpenApi;

/// OpenAPI documentation for all routes.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Fundus Analysis API",
        version = "1.0.0",
        description = "Diabetic-retinopathy analysis service for fundus photographs",
        license(name = "MIT"),
        contact(
            name = "Fundus Team",
            url = "https://github.com/fundus-ai/fundus-server"
        )
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development")
    ),
    paths(),
    components(schemas(
        health::HealthResponse,
        analyze::AnalyzeRequest,
        analyze::AnalyzeResponse,
        fundus_values::AnalysisReport,
        fundus_values::ImageArtifacts,
        fundus_values::PatientInfo,
        fundus_values::HealthStatus,
    ))
)]
pub struct ApiDoc;
