//! Export HTTP Route
//!
//! `GET /export` renders the whole document as an RTF download.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Router,
};
use chrono::Local;
use serde::Deserialize;

use crate::export::{export_document, MEDIA_TYPE};
use crate::observability::{log_event_with_fields, Event};
use crate::store::DocumentStore;

use super::entity_routes::with_store;
use super::errors::{ApiError, ApiResult};

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    /// Base of the generated file name; sanitized before use
    #[serde(default)]
    pub name: Option<String>,
}

/// Create export routes
pub fn export_routes(store: Arc<DocumentStore>) -> Router {
    Router::new()
        .route("/export", get(export_handler))
        .route("/export/", get(export_handler))
        .with_state(store)
}

async fn export_handler(
    State(store): State<Arc<DocumentStore>>,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> ApiResult<(StatusCode, HeaderMap, Vec<u8>)> {
    let Query(query) = query.map_err(|e| ApiError::InvalidQuery(e.body_text()))?;
    let generated_at = Local::now().naive_local();

    // The lock is held only for the load; rendering works on the snapshot.
    let export = with_store(&store, move |store| {
        let doc = store.load();
        Ok(export_document(&doc, query.name.as_deref(), generated_at))
    })
    .await?;

    log_event_with_fields(
        Event::ExportRendered,
        &[
            ("bytes", export.bytes.len().to_string().as_str()),
            ("filename", export.filename.as_str()),
        ],
    );

    let disposition = HeaderValue::from_str(&export.content_disposition())
        .map_err(|e| ApiError::Internal(format!("invalid export filename: {}", e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(MEDIA_TYPE));
    headers.insert(header::CONTENT_DISPOSITION, disposition);

    Ok((StatusCode::OK, headers, export.bytes))
}
