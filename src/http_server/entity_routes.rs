//! Entity HTTP Routes
//!
//! CRUD over the document's collections:
//!
//! | Method | Path                          | Operation              |
//! |--------|-------------------------------|------------------------|
//! | GET    | `/entity_types`               | list collection keys   |
//! | GET    | `/entities/{type}`            | list items (`?limit=`) |
//! | POST   | `/entities/{type}`            | create item            |
//! | GET    | `/entities/{type}/{id}`       | fetch item             |
//! | PUT    | `/entities/{type}/{id}`       | shallow-merge update   |
//! | DELETE | `/entities/{type}/{id}`       | remove item            |
//!
//! Every mutation runs inside [`DocumentStore::update`], so id allocation,
//! the change and the save form one atomic unit.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use crate::store::{item_id, next_id, DocumentStore, Item, ID_FIELD};

use super::errors::{ApiError, ApiResult};

// ==================
// Request Types
// ==================

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Maximum number of items returned
    #[serde(default)]
    pub limit: Option<usize>,
}

// ==================
// Entity Routes
// ==================

/// Create entity routes
///
/// Each path is also served with a trailing slash.
pub fn entity_routes(store: Arc<DocumentStore>) -> Router {
    let types = get(list_entity_types_handler);
    let collection = get(list_items_handler).post(create_item_handler);
    let item = get(get_item_handler)
        .put(update_item_handler)
        .delete(delete_item_handler);

    Router::new()
        .route("/entity_types", types.clone())
        .route("/entity_types/", types)
        .route("/entities/:entity_type", collection.clone())
        .route("/entities/:entity_type/", collection)
        .route("/entities/:entity_type/:item_id", item.clone())
        .route("/entities/:entity_type/:item_id/", item)
        .with_state(store)
}

// ==================
// Helper Functions
// ==================

/// Run store work on the blocking pool; file I/O must not stall the executor.
pub(super) async fn with_store<T, F>(store: &Arc<DocumentStore>, work: F) -> ApiResult<T>
where
    F: FnOnce(&DocumentStore) -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || work(&store))
        .await
        .map_err(|e| ApiError::Internal(format!("store task failed: {}", e)))?
}

/// Decoding failures in path segments answer with the JSON error body.
fn path_params<T>(path: Result<Path<T>, PathRejection>) -> ApiResult<T> {
    path.map(|Path(params)| params)
        .map_err(|e| ApiError::InvalidPath(e.body_text()))
}

/// Parse a POST/PUT body into a non-empty JSON object.
pub(super) fn parse_object_body(body: &[u8]) -> ApiResult<Item> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::InvalidBody(
            "Invalid or empty JSON data received.".to_string(),
        ));
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::InvalidBody(format!("Invalid JSON received: {}", e)))?;

    match value {
        Value::Object(map) if map.is_empty() => Err(ApiError::InvalidBody(
            "Invalid or empty JSON data received.".to_string(),
        )),
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::InvalidBody(
            "Request body must be a JSON object.".to_string(),
        )),
    }
}

// ==================
// Read Handlers
// ==================

async fn list_entity_types_handler(
    State(store): State<Arc<DocumentStore>>,
) -> ApiResult<Json<Vec<String>>> {
    let keys: Vec<String> = with_store(&store, |store| {
        Ok(store.load().keys().map(str::to_string).collect())
    })
    .await?;
    Ok(Json(keys))
}

async fn list_items_handler(
    State(store): State<Arc<DocumentStore>>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Item>>> {
    let entity_type = path_params(path)?;
    let Query(query) = query.map_err(|e| ApiError::InvalidQuery(e.body_text()))?;

    let items: Vec<Item> = with_store(&store, move |store| {
        let doc = store.load();
        let items = doc
            .collection(&entity_type)
            .ok_or_else(|| ApiError::CollectionNotFound(entity_type.clone()))?;
        let limit = query.limit.unwrap_or(items.len());
        Ok(items.iter().take(limit).cloned().collect())
    })
    .await?;

    Ok(Json(items))
}

async fn get_item_handler(
    State(store): State<Arc<DocumentStore>>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> ApiResult<Json<Item>> {
    let (entity_type, id) = path_params(path)?;
    let item = with_store(&store, move |store| {
        let doc = store.load();
        if doc.collection(&entity_type).is_none() {
            return Err(ApiError::CollectionNotFound(entity_type));
        }
        doc.find(&entity_type, &id)
            .cloned()
            .ok_or_else(|| ApiError::item_not_found(&entity_type, &id))
    })
    .await?;

    Ok(Json(item))
}

// ==================
// Write Handlers
// ==================

async fn create_item_handler(
    State(store): State<Arc<DocumentStore>>,
    path: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Item>)> {
    let entity_type = path_params(path)?;
    let fields = parse_object_body(&body);

    let created = with_store(&store, move |store| {
        store.update(|doc| {
            if doc.collection(&entity_type).is_none() {
                return Err(ApiError::CollectionNotFound(entity_type.clone()));
            }
            let fields = fields?;

            let mut item = Item::new();
            item.insert(ID_FIELD.to_string(), Value::String(next_id(&entity_type, doc)));
            item.extend(fields.into_iter().filter(|(key, _)| key != ID_FIELD));

            doc.collection_mut(&entity_type)
                .ok_or_else(|| ApiError::CollectionNotFound(entity_type.clone()))?
                .push(item.clone());
            Ok(item)
        })
    })
    .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_item_handler(
    State(store): State<Arc<DocumentStore>>,
    path: Result<Path<(String, String)>, PathRejection>,
    body: Bytes,
) -> ApiResult<Json<Item>> {
    let (entity_type, id) = path_params(path)?;
    let changes = parse_object_body(&body);

    let updated = with_store(&store, move |store| {
        store.update(|doc| {
            let items = doc
                .collection_mut(&entity_type)
                .ok_or_else(|| ApiError::CollectionNotFound(entity_type.clone()))?;
            let item = items
                .iter_mut()
                .find(|item| item_id(item) == Some(id.as_str()))
                .ok_or_else(|| ApiError::item_not_found(&entity_type, &id))?;
            let changes = changes?;

            // The path id is authoritative; a body id never reaches the item.
            for (key, value) in changes {
                if key != ID_FIELD {
                    item.insert(key, value);
                }
            }
            Ok(item.clone())
        })
    })
    .await?;

    Ok(Json(updated))
}

async fn delete_item_handler(
    State(store): State<Arc<DocumentStore>>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> ApiResult<StatusCode> {
    let (entity_type, id) = path_params(path)?;
    with_store(&store, move |store| {
        store.update(|doc| {
            let items = doc
                .collection_mut(&entity_type)
                .ok_or_else(|| ApiError::CollectionNotFound(entity_type.clone()))?;
            // Filter by id, not position.
            let before = items.len();
            items.retain(|item| item_id(item) != Some(id.as_str()));
            if items.len() == before {
                return Err(ApiError::item_not_found(&entity_type, &id));
            }
            Ok(())
        })
    })
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_body() {
        let item = parse_object_body(br#"{"description": "Must log in"}"#).unwrap();
        assert_eq!(item["description"], "Must log in");
    }

    #[test]
    fn test_parse_rejects_empty_and_blank() {
        assert!(matches!(parse_object_body(b""), Err(ApiError::InvalidBody(_))));
        assert!(matches!(parse_object_body(b"  \n"), Err(ApiError::InvalidBody(_))));
        assert!(matches!(parse_object_body(b"{}"), Err(ApiError::InvalidBody(_))));
    }

    #[test]
    fn test_parse_rejects_malformed_and_non_objects() {
        assert!(matches!(parse_object_body(b"{oops"), Err(ApiError::InvalidBody(_))));
        assert!(matches!(parse_object_body(b"[1, 2]"), Err(ApiError::InvalidBody(_))));
        assert!(matches!(parse_object_body(b"\"text\""), Err(ApiError::InvalidBody(_))));
    }
}
