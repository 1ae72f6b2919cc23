//! Observability HTTP Routes
//!
//! Health check plus the per-request log line middleware.

use axum::{
    extract::Request,
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::observability::{log_event_with_fields, Event};

/// Header carrying the id assigned to each request
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check route
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

/// Log one line per request and tag the response with a request id.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    log_event_with_fields(
        Event::RequestHandled,
        &[
            ("method", method.as_str()),
            ("path", path.as_str()),
            ("request_id", request_id.as_str()),
            ("status", response.status().as_str()),
        ],
    );

    response
}
