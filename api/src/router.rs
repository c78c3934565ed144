//! Router configuration and setup.

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::ApiConfig,
    error::ApiError,
    middleware,
    route_trait::{RegisterableRoute, RouteHandler},
    routes,
    traits::SharedState,
};

/// Configure routes and middleware.
///
/// Middleware layers are applied before `.with_state()` so the router keeps
/// the concrete `SharedState` type throughout.
pub fn configure_routes(state: SharedState, config: &ApiConfig) -> Router {
    // Trait-registered JSON routes
    let mut router = routes::analyze::AnalyzeRoute::register(Router::new());

    // GET probes carry no JSON body and register manually.
    router = router.route(
        "/health",
        get(
            |axum::extract::State(state): axum::extract::State<SharedState>| async move {
                let req = routes::health::HealthRequest;
                routes::health::HealthRoute::validate_request(&req).await?;
                let response = routes::health::HealthRoute::handle(req, &state).await?;
                Ok::<_, ApiError>(axum::Json(response))
            },
        ),
    );

    if config.enable_swagger {
        let openapi = routes::ApiDoc::openapi();
        router = router
            .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", openapi));
    }

    // Order matters: outer to inner.
    router = router
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new())
                .on_response(DefaultOnResponse::new()),
        )
        .layer(middleware::cors_layer(config))
        .layer(axum::extract::DefaultBodyLimit::max(config.max_body_bytes));

    router.with_state(state)
}
