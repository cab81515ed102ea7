//! Request correlation middleware.
//!
//! Generates a UUID v4 for each incoming request, exposes it to handlers via
//! request extensions, stamps it on the `X-Request-ID` response header, and
//! wraps the request in a tracing span so every log line emitted while
//! handling carries the `request_id` field.
//!
//! The same layer is the panic boundary: an unhandled panic in a handler is
//! converted into a 500 JSON document that still carries the correlation
//! identifier, logged in full server-side.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::REQUEST_ID_HEADER;
use crate::error::ApiError;
use crate::state::AppState;

/// Per-request correlation context, created before any handler runs and
/// discarded with the response. Never shared across requests.
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub id: Uuid,
    pub started: Instant,
}

impl RequestContext {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started: Instant::now(),
        }
    }
}

/// Middleware that assigns the request ID, spans the request, and converts
/// panics into 500 responses.
///
/// This should be inside only the header/CORS layers so that even its own
/// error responses pick up the hardened headers on the way out.
pub async fn correlation_layer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let ctx = RequestContext::new();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let span = tracing::info_span!(
        "request",
        request_id = %ctx.id,
        method = %method,
        path = %path,
        duration_ms = tracing::field::Empty,
    );

    request.extensions_mut().insert(ctx.clone());
    let expose_detail = !state.config.is_production();

    async move {
        let mut response = match AssertUnwindSafe(next.run(request)).catch_unwind().await {
            Ok(response) => response,
            Err(panic) => {
                let detail = panic_message(panic.as_ref());
                tracing::error!(detail = %detail, "Handler panicked");
                ApiError::Internal {
                    request_id: ctx.id,
                    detail,
                    expose_detail,
                }
                .into_response()
            }
        };

        response.headers_mut().insert(
            HeaderName::from_static(REQUEST_ID_HEADER),
            HeaderValue::from_str(&ctx.id.to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("invalid")),
        );

        let duration_ms = ctx.started.elapsed().as_millis() as u64;
        tracing::Span::current().record("duration_ms", duration_ms);
        tracing::info!(
            status = response.status().as_u16(),
            duration_ms,
            "Request completed"
        );

        response
    }
    .instrument(span)
    .await
}

/// Fixed-window rate limiting, applied only to the /health route family.
pub async fn rate_limit_layer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_addr(&request);
    if !state.limiter.try_acquire(client) {
        tracing::warn!(client = %client, "Rate limit exceeded");
        return ApiError::RateLimited.into_response();
    }
    next.run(request).await
}

/// Client IP from connection info; in-process callers (tests) share one
/// fallback key.
fn client_addr(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
