//! Synchronous key-value persistence.
//!
//! [`KeyValueStore`] is the raw string store (SQLite on disk, or memory).
//! [`LocalStorage`] layers JSON on top of it and absorbs every failure: reads
//! fall back to a caller-supplied default, failed writes are logged and
//! reported through the error hook, and neither ever reaches the caller as an
//! error.

mod memory;
mod schema;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorageError;

/// A string-keyed, string-valued store with synchronous reads and writes.
///
/// Every `set` replaces the whole value of the key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Receives storage failures that were absorbed instead of returned.
pub type ErrorHook = Box<dyn Fn(&StorageError) + Send + Sync>;

/// JSON adapter over a [`KeyValueStore`].
pub struct LocalStorage<S> {
    store: S,
    on_error: Option<ErrorHook>,
}

impl<S: KeyValueStore> LocalStorage<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            on_error: None,
        }
    }

    /// Installs the side channel for absorbed failures.
    pub fn on_error(mut self, hook: impl Fn(&StorageError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(hook));
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads and deserializes `key`, or returns `default`.
    ///
    /// An absent key is not a failure. An unreadable store or a value that
    /// does not deserialize into `T` is reported, then `default` is returned.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key, "No stored value, using default");
                return default;
            }
            Err(e) => {
                self.report(e);
                return default;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                tracing::debug!(key, bytes = raw.len(), "Loaded stored value");
                value
            }
            Err(e) => {
                self.report(StorageError::Corrupt {
                    key: key.to_string(),
                    message: e.to_string(),
                });
                default
            }
        }
    }

    /// Serializes `value` and overwrites `key` with it.
    ///
    /// Returns whether the write went through. A failed write is reported,
    /// never raised.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                self.report(StorageError::Serialize {
                    key: key.to_string(),
                    message: e.to_string(),
                });
                return false;
            }
        };

        match self.store.set(key, &raw) {
            Ok(()) => {
                tracing::debug!(key, bytes = raw.len(), "Saved value");
                true
            }
            Err(e) => {
                self.report(e);
                false
            }
        }
    }

    /// Removes `key`. Failures are reported like failed saves.
    pub fn clear(&self, key: &str) -> bool {
        match self.store.remove(key) {
            Ok(()) => true,
            Err(e) => {
                self.report(e);
                false
            }
        }
    }

    fn report(&self, error: StorageError) {
        tracing::warn!("Storage error: {}", error);
        if let Some(hook) = &self.on_error {
            hook(&error);
        }
    }
}
