//! Cart persistence.
//!
//! The cart is stored as one string entry in a synchronous key-value store:
//! a JSON array of `[itemId, state]` pairs under a fixed key. Storage failures
//! never block the in-memory cart. [`CartStorage::save`] logs and carries on,
//! and [`CartStorage::load`] treats anything unreadable as "no saved cart".

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use sweetcart_core::{CartItemState, ItemId};
use thiserror::Error;
use tracing::{debug, error, instrument, warn};

use crate::ledger::Ledger;

/// Default storage key.
pub const DEFAULT_STORAGE_KEY: &str = "itemStates";

/// Errors raised by a [`KeyValueStore`] or while decoding a saved cart.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store refused a write because it would exceed its quota.
    #[error("Quota exceeded writing {len} bytes to {key}")]
    QuotaExceeded { key: String, len: usize },

    /// Reading or writing the backing file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored value is not valid JSON, or could not be encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The stored value is valid JSON but not an array of pairs.
    #[error("Malformed cart state: {0}")]
    Malformed(String),
}

/// An opaque synchronous string-keyed store.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-memory store with an optional size quota.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Create an empty, unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes whose value is longer than `bytes`.
    #[must_use]
    pub const fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Raw value under `key`.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota
            && value.len() > quota
        {
            return Err(StorageError::QuotaExceeded {
                key: key.to_owned(),
                len: value.len(),
            });
        }
        self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

// =============================================================================
// FileStore
// =============================================================================

/// Store backed by a JSON object in a single file.
///
/// The file is read on every access and rewritten on every write, so several
/// processes see each other's saves. A missing file is an empty store.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store at `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(HashMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, items: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(items)?)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = match self.read_all() {
            Err(StorageError::Json(e)) => {
                warn!(path = %self.path.display(), error = %e, "Overwriting unreadable store file");
                HashMap::new()
            }
            other => other?,
        };
        items.insert(key.to_owned(), value.to_owned());
        self.write_all(&items)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        let mut items = self.read_all()?;
        if items.remove(key).is_some() {
            self.write_all(&items)?;
        }
        Ok(())
    }
}

// =============================================================================
// CartStorage
// =============================================================================

/// Persistence gateway for the cart ledger.
#[derive(Debug, Clone)]
pub struct CartStorage<K> {
    store: K,
    key: String,
}

impl<K: KeyValueStore> CartStorage<K> {
    /// Gateway using [`DEFAULT_STORAGE_KEY`].
    #[must_use]
    pub fn new(store: K) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    /// Gateway using a custom key.
    #[must_use]
    pub fn with_key(store: K, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The storage key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &K {
        &self.store
    }

    /// Persist the whole ledger. Errors are logged, never returned.
    #[instrument(skip_all, fields(key = %self.key, entries = ledger.len()))]
    pub fn save(&mut self, ledger: &Ledger) {
        if let Err(e) = self.try_save(ledger) {
            error!(error = %e, "Error saving cart state");
        }
    }

    /// Persist the whole ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the store rejects the write.
    pub fn try_save(&mut self, ledger: &Ledger) -> Result<(), StorageError> {
        let serialized = encode(ledger)?;
        self.store.set_item(&self.key, &serialized)
    }

    /// Read the saved cart.
    ///
    /// Returns `None` (and logs) when nothing is saved or the saved value
    /// cannot be decoded.
    #[instrument(skip_all, fields(key = %self.key))]
    pub fn load(&self) -> Option<Vec<(ItemId, CartItemState)>> {
        match self.try_load() {
            Ok(Some(entries)) => {
                debug!(entries = entries.len(), "Loaded cart state");
                Some(entries)
            }
            Ok(None) => {
                debug!("No saved cart state");
                None
            }
            Err(e) => {
                error!(error = %e, "Error reading saved cart state");
                None
            }
        }
    }

    /// Read the saved cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the saved value is not
    /// a JSON array of `[id, state]` pairs.
    pub fn try_load(&self) -> Result<Option<Vec<(ItemId, CartItemState)>>, StorageError> {
        self.store
            .get_item(&self.key)?
            .map(|serialized| decode(&serialized))
            .transpose()
    }

    /// Remove the saved cart. Errors are logged, never returned.
    pub fn clear(&mut self) {
        if let Err(e) = self.store.remove_item(&self.key) {
            warn!(key = %self.key, error = %e, "Error clearing saved cart state");
        }
    }
}

/// Encode a ledger as a JSON array of `[id, state]` pairs.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(ledger: &Ledger) -> Result<String, StorageError> {
    Ok(serde_json::to_string(&ledger.entries())?)
}

/// Decode a JSON array of `[id, state]` pairs.
///
/// Pairs that do not decode, pairs with an empty id and pairs with a negative
/// unit price are dropped with a warning; the rest are kept.
///
/// # Errors
///
/// Returns an error if the input is not JSON or not an array.
pub fn decode(serialized: &str) -> Result<Vec<(ItemId, CartItemState)>, StorageError> {
    let value: Value = serde_json::from_str(serialized)?;
    let pairs = match value {
        Value::Array(pairs) => pairs,
        other => {
            return Err(StorageError::Malformed(format!(
                "expected an array, got {}",
                json_kind(&other)
            )));
        }
    };

    Ok(pairs
        .into_iter()
        .enumerate()
        .filter_map(|(index, pair)| {
            let (id, state) = match serde_json::from_value::<(ItemId, CartItemState)>(pair) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(index, error = %e, "Dropping malformed saved cart entry");
                    return None;
                }
            };
            if id.is_empty() {
                warn!(index, "Dropping saved cart entry with empty id");
                return None;
            }
            if state.unit_price.is_sign_negative() {
                warn!(item_id = %id, "Dropping saved cart entry with negative price");
                return None;
            }
            Some((id, state))
        })
        .collect())
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
