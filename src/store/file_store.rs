//! File-backed document store
//!
//! The whole document lives in one JSON file. Every request reads it fresh;
//! there is no cross-request cache.
//!
//! All file access goes through one mutex. [`DocumentStore::update`] holds
//! that mutex across the full load -> mutate -> save sequence, so concurrent
//! writers are serialized and cannot lose each other's updates.
//!
//! Saves use the temp-file pattern:
//! 1. Write to `<file>.tmp`
//! 2. fsync the temp file
//! 3. Rename over the target (atomic on POSIX)
//!
//! A crash mid-save therefore leaves the previous document intact.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::observability::{log_event_with_fields, Event};

use super::document::Document;
use super::errors::{StoreError, StoreResult};

/// Owns the on-disk JSON document.
#[derive(Debug)]
pub struct DocumentStore {
    path: PathBuf,
    temp_path: PathBuf,
    lock: Mutex<()>,
}

impl DocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut temp: OsString = path.as_os_str().to_owned();
        temp.push(".tmp");
        Self {
            path,
            temp_path: PathBuf::from(temp),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document.
    ///
    /// Never fails: a missing or corrupt file yields [`Document::empty`]
    /// and a WARN log line. Nothing is written back.
    pub fn load(&self) -> Document {
        let _guard = self.acquire();
        self.read_document()
    }

    /// Overwrite the backing file with `doc`.
    ///
    /// Returns false on any failure; the failure itself is logged.
    pub fn save(&self, doc: &Document) -> bool {
        self.try_save(doc).is_ok()
    }

    /// Like [`save`](Self::save), but hands the failure back to the caller.
    pub fn try_save(&self, doc: &Document) -> StoreResult<()> {
        let _guard = self.acquire();
        self.persist(doc)
    }

    /// Run one read-modify-write cycle atomically.
    ///
    /// `mutate` sees a freshly loaded document. If it returns an error nothing
    /// is written. If it succeeds the document is saved before the lock is
    /// released; a failed save discards the mutation and surfaces as `E`.
    pub fn update<T, E>(&self, mutate: impl FnOnce(&mut Document) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let _guard = self.acquire();
        let mut doc = self.read_document();
        let output = mutate(&mut doc)?;
        self.persist(&doc)?;
        Ok(output)
    }

    /// Write the canonical empty document unless a file already exists.
    ///
    /// Returns `Ok(false)` when the file was already there.
    pub fn initialize(&self) -> StoreResult<bool> {
        let _guard = self.acquire();
        if self.path.exists() {
            return Ok(false);
        }
        self.persist(&Document::empty())?;
        log_event_with_fields(Event::DocumentInitialized, &[("path", self.path_str().as_str())]);
        Ok(true)
    }

    fn acquire(&self) -> MutexGuard<'_, ()> {
        // The guarded state is the file itself; a panic elsewhere leaves
        // nothing half-updated in memory.
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn path_str(&self) -> String {
        self.path.display().to_string()
    }

    fn read_document(&self) -> Document {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log_event_with_fields(Event::DocumentMissing, &[("path", self.path_str().as_str())]);
                return Document::empty();
            }
            Err(e) => {
                log_event_with_fields(
                    Event::DocumentCorrupt,
                    &[("path", self.path_str().as_str()), ("error", e.to_string().as_str())],
                );
                return Document::empty();
            }
        };

        match serde_json::from_str::<Document>(&content) {
            Ok(doc) => doc.with_known_collections(),
            Err(e) => {
                log_event_with_fields(
                    Event::DocumentCorrupt,
                    &[("path", self.path_str().as_str()), ("error", e.to_string().as_str())],
                );
                Document::empty()
            }
        }
    }

    fn persist(&self, doc: &Document) -> StoreResult<()> {
        match self.write_atomic(doc) {
            Ok(()) => {
                log_event_with_fields(Event::DocumentSaved, &[("path", self.path_str().as_str())]);
                Ok(())
            }
            Err(e) => {
                log_event_with_fields(
                    Event::DocumentSaveFailed,
                    &[("path", self.path_str().as_str()), ("error", e.to_string().as_str())],
                );
                Err(e)
            }
        }
    }

    fn write_atomic(&self, doc: &Document) -> StoreResult<()> {
        let parent = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(parent) = parent {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let mut content = serde_json::to_string_pretty(doc)?;
        content.push('\n');

        if let Err(e) = self.replace_with(content.as_bytes()) {
            // Never leave a partial temp file next to the document.
            let _ = fs::remove_file(&self.temp_path);
            return Err(e);
        }

        // Best effort: make the rename itself durable.
        if let Some(parent) = parent {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }

        Ok(())
    }

    /// Write `bytes` to the temp file, fsync it, then rename it over the target.
    fn replace_with(&self, bytes: &[u8]) -> StoreResult<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.temp_path)
            .map_err(|e| StoreError::io(&self.temp_path, e))?;

        file.write_all(bytes)
            .map_err(|e| StoreError::io(&self.temp_path, e))?;
        file.sync_all()
            .map_err(|e| StoreError::io(&self.temp_path, e))?;
        drop(file);

        fs::rename(&self.temp_path, &self.path).map_err(|e| StoreError::io(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> DocumentStore {
        DocumentStore::new(dir.path().join("requirements_data.json"))
    }

    #[test]
    fn test_missing_file_loads_empty_without_writing() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);

        assert_eq!(store.load(), Document::empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_corrupt_file_loads_empty_and_is_left_alone() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        fs::write(store.path(), "{ not json").unwrap();

        assert_eq!(store.load(), Document::empty());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{ not json");
    }

    #[test]
    fn test_wrong_shape_is_treated_as_corrupt() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        fs::write(store.path(), r#"{"requirements": "oops"}"#).unwrap();

        assert_eq!(store.load(), Document::empty());
    }

    #[test]
    fn test_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        let mut doc = Document::empty();
        doc.collection_mut("requirements").unwrap().push(
            json!({"id": "REQ001", "description": "Überprüfung"})
                .as_object()
                .cloned()
                .unwrap(),
        );

        assert!(store.save(&doc));
        assert_eq!(store.load(), doc);
        assert!(!store.temp_path.exists());

        // Non-ASCII written raw, pretty-printed
        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("Überprüfung"));
        assert!(raw.contains("\n  \"stakeholders\""));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let store = DocumentStore::new(tmp.path().join("nested/dir/data.json"));

        assert!(store.save(&Document::empty()));
        assert!(store.path().exists());
    }

    #[test]
    fn test_save_failure_returns_false() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("not_a_dir");
        fs::write(&blocker, "file").unwrap();
        let store = DocumentStore::new(blocker.join("data.json"));

        assert!(!store.save(&Document::empty()));
        assert!(store.try_save(&Document::empty()).is_err());
    }

    #[test]
    fn test_failed_replace_removes_temp_file() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        // A directory at the target path makes the final rename fail.
        fs::create_dir(store.path()).unwrap();

        assert!(store.try_save(&Document::empty()).is_err());
        assert!(!store.temp_path.exists());
        assert!(store.path().is_dir());
    }

    #[test]
    fn test_update_error_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);

        let result: Result<(), StoreError> = store.update(|doc| {
            doc.collection_mut("requirements").unwrap().clear();
            Err(StoreError::io("x", std::io::Error::new(ErrorKind::Other, "abort")))
        });

        assert!(result.is_err());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_initialize_only_once() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);

        assert!(store.initialize().unwrap());
        assert!(!store.initialize().unwrap());
        assert_eq!(store.load(), Document::empty());
    }
}
