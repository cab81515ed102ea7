//! Health endpoints for orchestration and monitoring infrastructure.
//!
//! Four probes with increasing detail: `/health/live` (process answers HTTP),
//! `/health/ready` (instance should receive traffic), `/health` (full report
//! with system metrics and dependency status), and `/health/status` (service
//! identity and build info). All are pure functions of the request, current
//! process state, and configuration; nothing is retained across requests.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::dependencies::DependencyStatusSet;
use crate::middleware::RequestContext;
use crate::readiness::Readiness;
use crate::report::{now_iso8601, HealthReport, ServiceStatusReport};
use crate::state::AppState;

/// Minimal probe body shared by the liveness and readiness endpoints.
#[derive(Serialize)]
pub struct ProbeResponse {
    status: &'static str,
    timestamp: String,
    id: Uuid,
}

/// Liveness probe: reports `alive` whenever the process can respond at all.
pub async fn live(Extension(ctx): Extension<RequestContext>) -> Json<ProbeResponse> {
    Json(ProbeResponse {
        status: "alive",
        timestamp: now_iso8601(),
        id: ctx.id,
    })
}

/// Readiness probe: consults the injected readiness check. A not-ready
/// verdict answers 503 so load balancers pull the instance from rotation;
/// degraded still serves.
pub async fn ready(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Response {
    let verdict = state.readiness.check();
    let status_code = if verdict.is_serving() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    if verdict != Readiness::Ready {
        tracing::warn!(readiness = verdict.as_str(), "Instance is not fully ready");
    }

    (
        status_code,
        Json(ProbeResponse {
            status: verdict.as_str(),
            timestamp: now_iso8601(),
            id: ctx.id,
        }),
    )
        .into_response()
}

/// Full health report: fresh metrics snapshot, dependency statuses, uptime.
pub async fn report(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Json<HealthReport> {
    let snapshot = state.metrics.snapshot();
    let dependencies =
        DependencyStatusSet::collect(&state.config.dependencies, &state.probes).await;
    Json(HealthReport::assemble(&ctx, snapshot, dependencies, &state))
}

/// Service identity and build information.
pub async fn status(State(state): State<AppState>) -> Json<ServiceStatusReport> {
    Json(ServiceStatusReport::assemble(&state))
}
