//! # Document Store
//!
//! Persistence for the entity document:
//! - [`Document`]: collection key -> ordered items, each an open JSON object
//! - [`DocumentStore`]: serialized load/save of the backing JSON file, plus
//!   an atomic read-modify-write unit
//! - [`next_id`]: human-readable identifier allocation (`REQ001`, ...)
//! - [`Collection`]: the fixed set of known collections and id prefixes

mod collection;
mod document;
mod errors;
mod file_store;
mod id_allocator;

pub use collection::{prefix_for, Collection};
pub use document::{item_id, Document, Item, ID_FIELD};
pub use errors::{StoreError, StoreResult};
pub use file_store::DocumentStore;
pub use id_allocator::next_id;
