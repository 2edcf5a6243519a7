pub mod json_file;
pub mod memory;

use std::fmt::Display;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::{config::ReportConfig, errors::StorageError};

pub use json_file::JsonFileBackend;
pub use memory::MemoryBackend;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Namespace applied to every key written by [`ReportStore`].
pub const DEFAULT_PREFIX: &str = "app_report_";

/// Synchronous string-keyed storage the report store sits on.
pub trait KeyValueBackend: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

impl<B: KeyValueBackend + ?Sized> KeyValueBackend for Box<B> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}

/// Best-effort JSON persistence for report data.
///
/// The plain methods log failures and fall back to a safe default (`None`
/// for reads, no-op for writes). The `try_*` variants return the error.
pub struct ReportStore<B> {
    backend: B,
    prefix: String,
}

impl<B: KeyValueBackend> ReportStore<B> {
    pub fn new(backend: B) -> Self {
        Self::with_prefix(backend, DEFAULT_PREFIX)
    }

    pub fn with_prefix(backend: B, prefix: impl Into<String>) -> Self {
        Self {
            backend,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    pub fn try_set<T: Serialize + ?Sized>(&self, key: &str, data: &T) -> Result<()> {
        let json = serde_json::to_string(data)?;
        self.backend.set_item(&self.storage_key(key), &json)?;
        debug!(key, "stored report data");
        Ok(())
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, data: &T) {
        if let Err(err) = self.try_set(key, data) {
            error!(key, error = %err, "failed to save report data");
        }
    }

    pub fn try_get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.backend.get_item(&self.storage_key(key))? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.try_get_as(key).unwrap_or_else(|err| {
            error!(key, error = %err, "failed to read report data");
            None
        })
    }

    pub fn try_get(&self, key: &str) -> Result<Option<Value>> {
        self.try_get_as(key)
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.get_as(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        match self.backend.get_item(&self.storage_key(key)) {
            Ok(found) => found.is_some(),
            Err(err) => {
                error!(key, error = %err, "failed to probe report data");
                false
            }
        }
    }

    /// Replaces the stored value with `update_fn(current)`.
    ///
    /// A missing or `null` entry is presented to `update_fn` as an empty
    /// object. Nothing is written unless the read and the transform succeed.
    pub fn try_update<F, E>(&self, key: &str, update_fn: F) -> Result<()>
    where
        F: FnOnce(Value) -> std::result::Result<Value, E>,
        E: Display,
    {
        let current = match self.try_get(key)? {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(value) => value,
        };
        let next = update_fn(current).map_err(|err| StorageError::Transform {
            key: key.to_string(),
            reason: err.to_string(),
        })?;
        self.try_set(key, &next)
    }

    pub fn update<F, E>(&self, key: &str, update_fn: F)
    where
        F: FnOnce(Value) -> std::result::Result<Value, E>,
        E: Display,
    {
        if let Err(err) = self.try_update(key, update_fn) {
            error!(key, error = %err, "failed to update report data");
        }
    }

    /// Typed variant of [`ReportStore::try_update`]; absent entries start
    /// from `T::default()`.
    pub fn try_update_as<T, F, E>(&self, key: &str, update_fn: F) -> Result<()>
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce(T) -> std::result::Result<T, E>,
        E: Display,
    {
        let current = self.try_get_as::<T>(key)?.unwrap_or_default();
        let next = update_fn(current).map_err(|err| StorageError::Transform {
            key: key.to_string(),
            reason: err.to_string(),
        })?;
        self.try_set(key, &next)
    }

    pub fn update_as<T, F, E>(&self, key: &str, update_fn: F)
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce(T) -> std::result::Result<T, E>,
        E: Display,
    {
        if let Err(err) = self.try_update_as(key, update_fn) {
            error!(key, error = %err, "failed to update report data");
        }
    }

    pub fn try_clear(&self, key: &str) -> Result<()> {
        self.backend.remove_item(&self.storage_key(key))?;
        debug!(key, "cleared report data");
        Ok(())
    }

    pub fn clear(&self, key: &str) {
        if let Err(err) = self.try_clear(key) {
            error!(key, error = %err, "failed to clear report data");
        }
    }
}

impl ReportStore<JsonFileBackend> {
    /// Opens the file-backed store described by `config`.
    pub fn open(config: &ReportConfig) -> Result<Self> {
        let backend = JsonFileBackend::new(config.store_file())?;
        Ok(Self::with_prefix(backend, config.storage_prefix.clone()))
    }
}
