//! # API Errors
//!
//! Every failure a handler can report, and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// API errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Collection key not present in the document
    #[error("Entity type '{0}' not found.")]
    CollectionNotFound(String),

    /// No item with this id in the collection
    #[error("Item with ID '{id}' not found in '{collection}'.")]
    ItemNotFound { collection: String, id: String },

    /// Body absent, not JSON, not an object, or an empty object
    #[error("{0}")]
    InvalidBody(String),

    /// Query string could not be parsed
    #[error("Invalid query parameter: {0}")]
    InvalidQuery(String),

    /// Path segments could not be decoded
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// No route matches the path
    #[error("API endpoint not found.")]
    RouteNotFound,

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Mutation computed but the document could not be saved
    #[error("Failed to save data: {0}")]
    Persistence(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) | ApiError::InvalidQuery(_) | ApiError::InvalidPath(_) => {
                StatusCode::BAD_REQUEST
            }

            ApiError::CollectionNotFound(_)
            | ApiError::ItemNotFound { .. }
            | ApiError::RouteNotFound => StatusCode::NOT_FOUND,

            ApiError::Persistence(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn item_not_found(collection: &str, id: &str) -> Self {
        ApiError::ItemNotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            error: err.to_string(),
            code: err.status_code().as_u16(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorResponse::from(&self))).into_response()
    }
}
