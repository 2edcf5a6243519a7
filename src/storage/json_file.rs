use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use tracing::debug;

use super::{KeyValueBackend, Result};
use crate::{
    errors::StorageError,
    utils::{fs::write_atomic, paths::ensure_dir},
};

type Items = BTreeMap<String, String>;

/// Backend persisting every key in one JSON object file.
///
/// Each write rewrites the whole file via a temporary sibling and a rename.
/// A file that cannot be decoded is never overwritten.
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    guard: Mutex<()>,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        Ok(Self {
            path,
            guard: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.guard
            .lock()
            .map_err(|_| StorageError::Backend("store file lock poisoned".into()))
    }

    fn read_items(&self) -> Result<Items> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Items::new()),
            Err(err) => return Err(err.into()),
        };
        if data.trim().is_empty() {
            return Ok(Items::new());
        }
        serde_json::from_str(&data).map_err(|err| StorageError::Corrupt {
            path: self.path.clone(),
            reason: err.to_string(),
        })
    }

    fn write_items(&self, items: &Items) -> Result<()> {
        let json = serde_json::to_string_pretty(items)?;
        write_atomic(&self.path, &json)?;
        debug!(path = %self.path.display(), entries = items.len(), "store file written");
        Ok(())
    }
}

impl KeyValueBackend for JsonFileBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock()?;
        Ok(self.read_items()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock()?;
        let mut items = self.read_items()?;
        items.insert(key.to_string(), value.to_string());
        self.write_items(&items)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let _guard = self.lock()?;
        let mut items = self.read_items()?;
        if items.remove(key).is_some() {
            self.write_items(&items)?;
        }
        Ok(())
    }
}
