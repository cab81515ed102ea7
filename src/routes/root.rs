//! Service descriptor at `/`.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::config::SERVICE_TITLE;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ServiceDescriptor {
    message: &'static str,
    version: String,
    docs: &'static str,
    health: &'static str,
}

/// Static descriptor pointing callers at the documented endpoints.
pub async fn index(State(state): State<AppState>) -> Json<ServiceDescriptor> {
    Json(ServiceDescriptor {
        message: SERVICE_TITLE,
        version: state.config.service.version.clone(),
        docs: "/docs",
        health: "/health",
    })
}
