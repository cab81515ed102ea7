//! Error taxonomy for the HTTP surface.
//!
//! Domain logic (metrics sampling, dependency aggregation) never returns
//! errors; faults degrade to default values inside each component. What is
//! left is the route-level taxonomy: unmatched paths, rate-limit rejections,
//! and panics caught by the correlation middleware. All of them render as
//! JSON and carry the correlation identifier where the contract requires it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not Found")]
    NotFound { path: String, request_id: Uuid },

    #[error("Internal Server Error")]
    Internal {
        request_id: Uuid,
        detail: String,
        /// Detail reaches the client only outside production.
        expose_detail: bool,
    },

    #[error("Too Many Requests")]
    RateLimited,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound { path, request_id } => (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "Not Found",
                    "path": path,
                    "requestId": request_id,
                })),
            )
                .into_response(),
            ApiError::Internal {
                request_id,
                detail,
                expose_detail,
            } => {
                let message = if expose_detail {
                    detail
                } else {
                    "An unexpected error occurred".to_string()
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal Server Error",
                        "requestId": request_id,
                        "message": message,
                    })),
                )
                    .into_response()
            }
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({
                    "error": "Too Many Requests",
                    "message": "Rate limit exceeded for health endpoints, retry later",
                })),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn internal_error_hides_detail_when_not_exposed() {
        let request_id = Uuid::new_v4();
        let response = ApiError::Internal {
            request_id,
            detail: "db pool exploded".to_string(),
            expose_detail: false,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("body");
        let value: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(value["error"], "Internal Server Error");
        assert_eq!(value["requestId"], request_id.to_string());
        assert_eq!(value["message"], "An unexpected error occurred");
    }

    #[tokio::test]
    async fn internal_error_exposes_detail_outside_production() {
        let response = ApiError::Internal {
            request_id: Uuid::new_v4(),
            detail: "db pool exploded".to_string(),
            expose_detail: true,
        }
        .into_response();

        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("body");
        let value: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(value["message"], "db pool exploded");
    }

    #[tokio::test]
    async fn not_found_carries_path_and_request_id() {
        let request_id = Uuid::new_v4();
        let response = ApiError::NotFound {
            path: "/missing".to_string(),
            request_id,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("body");
        let value: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(value["error"], "Not Found");
        assert_eq!(value["path"], "/missing");
        assert_eq!(value["requestId"], request_id.to_string());
    }
}
