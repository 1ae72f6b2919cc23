//! # HTTP Server Module
//!
//! The entity API, served with Axum.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/entity_types` - Known collection keys
//! - `/api/entities/*` - Collection and item CRUD
//! - `/api/export` - Whole document as an RTF download

pub mod config;
pub mod entity_routes;
pub mod errors;
pub mod export_routes;
pub mod observability_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use server::HttpServer;
