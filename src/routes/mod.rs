//! HTTP route handlers for the health API.
//!
//! The route table is fixed and read-only: a service descriptor at `/`, the
//! health family under `/health`, endpoint documentation at `/docs`, and a
//! JSON 404 fallback. Per-route Cache-Control headers follow the content:
//! probes are no-store, the static descriptor pages cache briefly.
//!
//! Layer order (outermost first): hardened security headers, CORS,
//! correlation middleware, compression. The correlation layer sits inside
//! the header layers so even its panic-recovery responses carry them; the
//! rate limiter applies only to the /health family.

pub mod docs;
pub mod health;
pub mod root;

use axum::{
    extract::Request, middleware, response::Response, routing::get, Extension, Router,
};
use http::header::{CACHE_CONTROL, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS, X_XSS_PROTECTION};
use http::{HeaderValue, Method};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{CACHE_CONTROL_DOCS, CACHE_CONTROL_HEALTH};
use crate::error::ApiError;
use crate::middleware::{correlation_layer, rate_limit_layer, RequestContext};
use crate::state::AppState;

/// Creates the Axum router with all routes, middleware, and headers.
pub fn create_router(state: AppState) -> Router {
    // Health family - never cached, rate limited
    let health_routes = Router::new()
        .route("/health", get(health::report))
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .route("/health/status", get(health::status))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_layer,
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_HEALTH),
        ));

    // Static descriptor pages - short cache
    let descriptor_routes = Router::new()
        .route("/", get(root::index))
        .route("/docs", get(docs::docs))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_DOCS),
        ));

    Router::new()
        .merge(health_routes)
        .merge(descriptor_routes)
        .fallback(not_found)
        .with_state(state.clone())
        // Compress response bodies when the client accepts it
        .layer(CompressionLayer::new())
        // Correlation middleware - request ID, request span, panic boundary
        .layer(middleware::from_fn_with_state(state, correlation_layer))
        // CORS - monitoring dashboards may call from any origin, read-only API
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET]),
        )
        // Hardened security headers on every response, error paths included
        .layer(SetResponseHeaderLayer::if_not_present(
            X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
}

/// JSON 404 for any unmatched path.
async fn not_found(Extension(ctx): Extension<RequestContext>, request: Request) -> Response {
    use axum::response::IntoResponse;

    ApiError::NotFound {
        path: request.uri().path().to_string(),
        request_id: ctx.id,
    }
    .into_response()
}
