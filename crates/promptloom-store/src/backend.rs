//! # Document backends
//!
//! The stores persist whole documents under a string key and never write partially.
//! A backend only needs to read, replace and remove a document by key, so the storage
//! medium can be swapped without touching the CRUD logic.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::fs;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Key-value storage of serialized documents.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Read a document. `Ok(None)` when no document exists under `key`.
    async fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replace the document under `key` with `contents`.
    async fn write(&self, key: &str, contents: &str) -> StoreResult<()>;

    /// Remove a document. Removing an absent document is not an error.
    async fn remove(&self, key: &str) -> StoreResult<()>;
}

/// In-process backend, the equivalent of browser local storage for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    documents: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document, e.g. to simulate previously persisted or corrupted state.
    pub fn with_document(self, key: impl Into<String>, contents: impl Into<String>) -> Self {
        self.documents.write().insert(key.into(), contents.into());
        self
    }

    /// Current raw contents under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.documents.read().get(key).cloned()
    }
}

#[async_trait]
impl DocumentBackend for MemoryBackend {
    async fn read(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.documents.read().get(key).cloned())
    }

    async fn write(&self, key: &str, contents: &str) -> StoreResult<()> {
        self.documents
            .write()
            .insert(key.to_string(), contents.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.documents.write().remove(key);
        Ok(())
    }
}

/// One JSON file per key below a root directory.
///
/// ```text
/// <root>/
/// ├── prompt-history.json
/// └── prompt-templates.json
/// ```
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn init(&self) -> StoreResult<()> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    pub fn path_for_key(&self, key: &str) -> StoreResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl DocumentBackend for FileBackend {
    async fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for_key(key)?;
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    async fn write(&self, key: &str, contents: &str) -> StoreResult<()> {
        self.init().await?;
        let path = self.path_for_key(key)?;
        // write-then-rename so a crash never leaves a half written document
        let tmp_path = self.root.join(format!(".{}.json.tmp", key));
        fs::write(&tmp_path, contents).await?;
        fs::rename(&tmp_path, &path).await?;
        debug!("Wrote document {} ({} bytes)", path.display(), contents.len());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.path_for_key(key)?;
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Io(err)),
        }
    }
}
