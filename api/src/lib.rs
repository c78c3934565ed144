//! Fundus API Crate
//!
//! Self-contained HTTP API layer using Axum for the fundus analysis server.
//!
//! # Architecture
//!
//! - Two routes: `POST /v1/analyze` (image analysis) and `GET /health`
//!   (readiness probe), both talking to the backend exclusively through the
//!   [`AppStateProvider`] trait.
//! - RFC 7807 problem-details error responses with a fixed mapping from the
//!   analysis error taxonomy to HTTP status codes, so callers can
//!   distinguish "service not ready" (503) from "bad input" (400) from
//!   "analysis failed" (500).
//! - Middleware stack: CORS, HTTP tracing, compression, body size limit.
//! - OpenAPI documentation with optional Swagger UI.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fundus_values::{AppStateProvider, RequestValue, ResponseValue, HealthStatus};
//!
//! struct MyState;
//!
//! #[async_trait::async_trait]
//! impl AppStateProvider for MyState {
//!     async fn handle_request(&self, _req: RequestValue)
//!         -> anyhow::Result<ResponseValue>
//!     {
//!         Ok(ResponseValue::health(HealthStatus::Healthy, true))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let state = Arc::new(MyState);
//!     fundus_api::run_server(state, 8000).await
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod config;
mod error;
mod middleware;
mod router;
mod routes;
pub mod route_trait;
mod traits;

// Re-export public API
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use router::configure_routes;
pub use traits::SharedState;

use std::net::SocketAddr;
use std::sync::Arc;

use fundus_values::AppStateProvider;

/// Run the HTTP API server with default configuration on the given port.
///
/// # Errors
///
/// Returns an error if the port is already in use, the server fails to
/// bind, or the server encounters a fatal error.
pub async fn run_server<S>(state: S, port: u16) -> anyhow::Result<()>
where
    S: AppStateProvider + 'static,
{
    run_server_with_config(
        Arc::new(state) as SharedState,
        ApiConfig {
            port,
            ..Default::default()
        },
    )
    .await
}

/// Run the HTTP API server with custom configuration.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server_with_config(state: SharedState, config: ApiConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("fundus API server listening on http://{}", addr);
    if config.enable_swagger {
        tracing::info!("Swagger UI:   http://{}/swagger-ui/", addr);
        tracing::info!("OpenAPI spec: http://{}/api-doc/openapi.json", addr);
    }

    let app = configure_routes(state, &config);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
