//! Lazily loaded, fully rewritten persisted documents.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::backend::DocumentBackend;
use crate::error::StoreResult;

/// Result of loading a persisted document.
///
/// Corrupt data degrades to an empty document, but stays distinguishable from "nothing
/// stored yet".
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    /// Document present and well formed
    Loaded(T),
    /// No document stored under the key
    Missing,
    /// Document present but unreadable; treated as empty
    Recovered { reason: String },
}

impl<T: Default> LoadOutcome<T> {
    /// The loaded value, or an empty one for `Missing` and `Recovered`.
    pub fn into_value(self) -> T {
        match self {
            LoadOutcome::Loaded(value) => value,
            LoadOutcome::Missing | LoadOutcome::Recovered { .. } => T::default(),
        }
    }
}

impl<T> LoadOutcome<T> {
    pub fn status(&self) -> LoadStatus {
        match self {
            LoadOutcome::Loaded(_) => LoadStatus::Loaded,
            LoadOutcome::Missing => LoadStatus::Missing,
            LoadOutcome::Recovered { .. } => LoadStatus::Recovered,
        }
    }

    pub fn is_recovered(&self) -> bool {
        matches!(self, LoadOutcome::Recovered { .. })
    }
}

/// How the cached copy of a document came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Not read from the backend yet
    NotLoaded,
    Loaded,
    Missing,
    Recovered,
}

/// Read and decode the document under `key`.
///
/// Backend failures propagate. Decode failures become [`LoadOutcome::Recovered`].
pub async fn load_document<T: DeserializeOwned>(
    backend: &dyn DocumentBackend,
    key: &str,
) -> StoreResult<LoadOutcome<T>> {
    let Some(raw) = backend.read(key).await? else {
        debug!("No document stored under {}", key);
        return Ok(LoadOutcome::Missing);
    };

    match serde_json::from_str::<T>(&raw) {
        Ok(value) => {
            debug!("Loaded document {} ({} bytes)", key, raw.len());
            Ok(LoadOutcome::Loaded(value))
        }
        Err(err) => {
            warn!("Document {} is corrupt, starting empty: {}", key, err);
            Ok(LoadOutcome::Recovered {
                reason: err.to_string(),
            })
        }
    }
}

/// What a mutation closure decided.
pub(crate) enum Change<R> {
    /// Persist the mutated document and return `R`
    Write(R),
    /// Leave the document untouched and return `R`
    Skip(R),
}

struct CellState<T> {
    value: Option<T>,
    status: LoadStatus,
}

/// One persisted document with a lazily populated cache.
///
/// Every mutation works on a copy, rewrites the whole document, and only then replaces the
/// cached copy, so a failed write leaves memory and medium in agreement.
pub(crate) struct DocumentCell<T> {
    backend: Arc<dyn DocumentBackend>,
    key: String,
    state: Mutex<CellState<T>>,
}

impl<T> DocumentCell<T>
where
    T: Serialize + DeserializeOwned + Default + Clone + Send,
{
    pub(crate) fn new(backend: Arc<dyn DocumentBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            state: Mutex::new(CellState {
                value: None,
                status: LoadStatus::NotLoaded,
            }),
        }
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    pub(crate) async fn status(&self) -> LoadStatus {
        self.state.lock().await.status
    }

    pub(crate) async fn read<R>(&self, f: impl FnOnce(&T) -> R) -> StoreResult<R> {
        let mut state = self.state.lock().await;
        let value = self.ensure_loaded(&mut state).await?;
        Ok(f(value))
    }

    pub(crate) async fn update<R>(&self, f: impl FnOnce(&mut T) -> Change<R>) -> StoreResult<R> {
        let mut state = self.state.lock().await;
        let mut draft = self.ensure_loaded(&mut state).await?.clone();

        match f(&mut draft) {
            Change::Skip(result) => Ok(result),
            Change::Write(result) => {
                self.persist(&draft).await?;
                state.value = Some(draft);
                state.status = LoadStatus::Loaded;
                Ok(result)
            }
        }
    }

    pub(crate) async fn replace(&self, value: T) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        self.persist(&value).await?;
        state.value = Some(value);
        state.status = LoadStatus::Loaded;
        Ok(())
    }

    /// Drop the cached copy and read the medium again.
    pub(crate) async fn reload(&self) -> StoreResult<LoadStatus> {
        let mut state = self.state.lock().await;
        state.value = None;
        self.ensure_loaded(&mut state).await?;
        Ok(state.status)
    }

    async fn ensure_loaded<'a>(&self, state: &'a mut CellState<T>) -> StoreResult<&'a T> {
        if state.value.is_none() {
            let outcome = load_document::<T>(self.backend.as_ref(), &self.key).await?;
            state.status = outcome.status();
            state.value = Some(outcome.into_value());
        }
        Ok(&*state.value.get_or_insert_with(T::default))
    }

    async fn persist(&self, value: &T) -> StoreResult<()> {
        let content = serde_json::to_string(value)?;
        self.backend.write(&self.key, &content).await
    }
}
