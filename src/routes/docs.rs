//! Endpoint documentation at `/docs`.
//!
//! A static listing of the route table with descriptions and sample
//! responses, so the API is self-describing for its consumers.

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::SERVICE_TITLE;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ApiDocs {
    title: &'static str,
    version: String,
    endpoints: Vec<EndpointDoc>,
    examples: Value,
}

#[derive(Serialize)]
pub struct EndpointDoc {
    method: &'static str,
    path: &'static str,
    description: &'static str,
    response: &'static str,
}

const ENDPOINTS: &[EndpointDoc] = &[
    EndpointDoc {
        method: "GET",
        path: "/",
        description: "Service descriptor with links to docs and health",
        response: "200 {message, version, docs, health}",
    },
    EndpointDoc {
        method: "GET",
        path: "/health/live",
        description: "Liveness probe, always alive while the process runs",
        response: "200 {status, timestamp, id}",
    },
    EndpointDoc {
        method: "GET",
        path: "/health/ready",
        description: "Readiness probe; 503 when the instance must leave rotation",
        response: "200|503 {status, timestamp, id}",
    },
    EndpointDoc {
        method: "GET",
        path: "/health",
        description: "Full health report with system metrics and dependency status",
        response: "200 {status, timestamp, version, uptime, requestId, system, dependencies, environment}",
    },
    EndpointDoc {
        method: "GET",
        path: "/health/status",
        description: "Service identity, uptime, and build information",
        response: "200 {service, version, environment, timestamp, startedAt, uptimeSeconds, buildInfo}",
    },
    EndpointDoc {
        method: "GET",
        path: "/docs",
        description: "This document",
        response: "200 {title, version, endpoints, examples}",
    },
];

/// Static route-table documentation.
pub async fn docs(State(state): State<AppState>) -> Json<ApiDocs> {
    Json(ApiDocs {
        title: SERVICE_TITLE,
        version: state.config.service.version.clone(),
        endpoints: ENDPOINTS
            .iter()
            .map(|e| EndpointDoc {
                method: e.method,
                path: e.path,
                description: e.description,
                response: e.response,
            })
            .collect(),
        examples: json!({
            "liveness": "curl -s http://localhost:3000/health/live",
            "full_report": "curl -s http://localhost:3000/health",
            "status": "curl -s http://localhost:3000/health/status",
        }),
    })
}
