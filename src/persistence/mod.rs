//! Key-value persistence
//!
//! Two independent records live in storage:
//! - best score (`highscores`)
//! - word-collection progress (`progress`)
//!
//! Reads fall back to documented defaults and writes are fire-and-forget.
//! Storage errors never reach the tick loop.

pub mod progress;

use std::collections::HashMap;

use thiserror::Error;

pub use progress::{SavedProgress, clear_progress, load_progress, save_progress};

/// Errors reported by a storage backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No storage exists (private browsing, sandboxed frame, native build)
    #[error("storage unavailable")]
    Unavailable,
    /// Write rejected because the backend is full
    #[error("storage quota exceeded")]
    QuotaExceeded,
    /// Any other backend failure
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Synchronous string key-value store
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage for native builds and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Storage that fails every call, for exercising fallbacks
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStorage;

impl Storage for UnavailableStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }

    fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    inner: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    /// Bind to `window.localStorage`; a missing store turns every call into `Unavailable`
    pub fn new() -> Self {
        let inner = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if inner.is_none() {
            log::warn!("LocalStorage unavailable, progress will not be saved");
        }
        Self { inner }
    }

    fn store(&self) -> Result<&web_sys::Storage, StorageError> {
        self.inner.as_ref().ok_or(StorageError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
fn js_error(err: wasm_bindgen::JsValue) -> StorageError {
    let msg = err.as_string().unwrap_or_else(|| format!("{:?}", err));
    if msg.contains("Quota") {
        StorageError::QuotaExceeded
    } else {
        StorageError::Backend(msg)
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.store()?.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.store()?.set_item(key, value).map_err(js_error)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.store()?.remove_item(key).map_err(js_error)
    }
}
