//! # HTTP Server
//!
//! Combines the entity, export and health routers with the CORS and
//! request-logging middleware, and runs them on a tokio listener.

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, Method, StatusCode},
    middleware::{self, Next},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::observability::{log_event, log_event_with_fields, Event};
use crate::store::DocumentStore;

use super::config::HttpServerConfig;
use super::entity_routes::entity_routes;
use super::errors::ApiError;
use super::export_routes::export_routes;
use super::observability_routes::{health_routes, log_requests};

/// HTTP server for the entity API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over `store`
    pub fn new(config: HttpServerConfig, store: Arc<DocumentStore>) -> Self {
        let router = Self::build_router(&config, store);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, store: Arc<DocumentStore>) -> Router {
        Router::new()
            // Health check at root level
            .merge(health_routes())
            // Entity CRUD and export under /api
            .nest(
                "/api",
                entity_routes(Arc::clone(&store)).merge(export_routes(store)),
            )
            .fallback(route_not_found)
            .layer(cors_layer(config))
            // Outside the CORS layer so it sees the preflight response
            .layer(middleware::from_fn(preflight_no_content))
            .layer(middleware::from_fn(log_requests))
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl+C.
    pub async fn start(self) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        let local = listener.local_addr()?.to_string();

        log_event_with_fields(
            Event::Serving,
            &[
                ("addr", local.as_str()),
                ("api", "/api/entities"),
                ("export", "/api/export"),
            ],
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        log_event(Event::ShutdownComplete);
        Ok(())
    }
}

/// Permissive unless origins are configured.
fn cors_layer(config: &HttpServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    if config.is_permissive() {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

/// Every OPTIONS request answers 204 No Content, keeping the CORS headers.
async fn preflight_no_content(request: Request, next: Next) -> Response {
    let is_options = request.method() == Method::OPTIONS;
    let mut response = next.run(request).await;
    if is_options {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}

async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

async fn shutdown_signal() {
    // If the handler cannot be installed, keep serving until the process is killed.
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(tmp: &TempDir) -> Arc<DocumentStore> {
        Arc::new(DocumentStore::new(tmp.path().join("data.json")))
    }

    #[test]
    fn test_server_creation() {
        let tmp = TempDir::new().unwrap();
        let server = HttpServer::new(HttpServerConfig::default(), store(&tmp));
        assert_eq!(server.socket_addr(), "localhost:8000");
    }

    #[test]
    fn test_server_with_custom_port() {
        let tmp = TempDir::new().unwrap();
        let server = HttpServer::new(HttpServerConfig::with_port(8080), store(&tmp));
        assert_eq!(server.socket_addr(), "localhost:8080");
    }

    #[test]
    fn test_router_builds_with_origin_list() {
        let tmp = TempDir::new().unwrap();
        let config = HttpServerConfig {
            cors_origins: vec!["http://localhost:5173".to_string()],
            ..Default::default()
        };
        let _router = HttpServer::new(config, store(&tmp)).router();
    }
}
