//! Route handler trait system.
//!
//! Every route implements [`RouteHandler`], which forces each one to carry
//! metadata, request validation, and declared test cases. Registration goes
//! through [`RegisterableRoute`], so a route cannot reach the router without
//! satisfying the trait.

use axum::http::Method;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::{ApiError, ApiResult};
use crate::traits::SharedState;

/// Compile-time enforced information about each route.
#[derive(Debug, Clone)]
pub struct RouteMetadata {
    /// HTTP path (e.g., "/v1/analyze").
    pub path: &'static str,
    /// HTTP method.
    pub method: Method,
    /// OpenAPI tags for grouping.
    pub tags: &'static [&'static str],
    /// Description for documentation; must be non-empty.
    pub description: &'static str,
    /// Whether repeating the request is side-effect free.
    pub idempotent: bool,
    /// Whether the route requires authentication.
    pub requires_auth: bool,
}

/// A declared test case for a route, consumed by the route's own tests.
#[derive(Debug)]
pub struct TestCase<Req> {
    /// Test case name.
    pub name: &'static str,
    /// The request to feed the handler.
    pub request: Req,
    /// Whether the handler is expected to succeed.
    pub expect_success: bool,
}

impl<Req> TestCase<Req> {
    /// A case whose handler call is expected to succeed.
    pub fn success(name: &'static str, request: Req) -> Self {
        Self {
            name,
            request,
            expect_success: true,
        }
    }

    /// A case whose validation or handler call is expected to fail.
    pub fn failure(name: &'static str, request: Req) -> Self {
        Self {
            name,
            request,
            expect_success: false,
        }
    }
}

/// Route handler trait - all routes implement this.
///
/// Handlers must generate a request id, log begin and outcome, validate
/// before handling, and return [`ApiError`] rather than panic.
#[async_trait]
pub trait RouteHandler: Send + Sync + 'static {
    /// Request type.
    type Request: DeserializeOwned + Debug + Send + Sync;

    /// Response type.
    type Response: Serialize + Debug + Send + Sync;

    /// Route metadata; the description must be non-empty.
    fn metadata() -> RouteMetadata;

    /// Validate the request before handling. Return
    /// [`ApiError::BadRequest`] or [`ApiError::ValidationError`] on failure.
    async fn validate_request(req: &Self::Request) -> ApiResult<()>;

    /// Handle the request against the backend.
    async fn handle<S>(req: Self::Request, state: &S) -> ApiResult<Self::Response>
    where
        S: crate::traits::AppStateProvider + Send + Sync;

    /// Declared test cases; every route must declare at least one.
    fn test_cases() -> Vec<TestCase<Self::Request>>;

    /// Sanity-check the implementation; called from the route's tests.
    fn verify_implementation() -> bool {
        let metadata = Self::metadata();
        assert!(
            !metadata.description.is_empty(),
            "route {} must document itself",
            metadata.path
        );
        assert!(!metadata.path.is_empty(), "route has an empty path");
        assert!(
            !Self::test_cases().is_empty(),
            "route {} must declare test cases",
            metadata.path
        );
        true
    }
}

/// Route registration trait, auto-implemented for every [`RouteHandler`].
///
/// The default registration wires a JSON-body handler that runs validation
/// then the handler. Routes without a JSON body (plain GET probes) register
/// manually in the router instead.
pub trait RegisterableRoute: RouteHandler {
    /// Register this route with the Axum router.
    fn register(router: axum::Router<SharedState>) -> axum::Router<SharedState> {
        let metadata = Self::metadata();

        let handler = |axum::extract::State(state): axum::extract::State<SharedState>,
                       axum::Json(req): axum::Json<Self::Request>| async move {
            Self::validate_request(&req).await?;
            let response = Self::handle(req, &state).await?;
            Ok::<_, ApiError>(axum::Json(response))
        };

        match metadata.method {
            Method::POST => router.route(metadata.path, axum::routing::post(handler)),
            Method::PUT => router.route(metadata.path, axum::routing::put(handler)),
            Method::DELETE => router.route(metadata.path, axum::routing::delete(handler)),
            other => panic!(
                "route {} uses {}, which has no JSON body; register it manually",
                metadata.path, other
            ),
        }
    }
}

impl<T: RouteHandler> RegisterableRoute for T {}
