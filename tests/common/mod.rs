#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};

use report_core::{
    storage::{JsonFileBackend, KeyValueBackend, MemoryBackend, ReportStore},
    StorageError,
};
use tempfile::TempDir;

/// Memory backend whose reads or writes can be switched to fail, standing in
/// for a full or unavailable store.
#[derive(Default)]
pub struct FlakyBackend {
    inner: MemoryBackend,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FlakyBackend {
    pub fn fail_reads(&self, on: bool) {
        self.fail_reads.store(on, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &MemoryBackend {
        &self.inner
    }

    fn check(flag: &AtomicBool, what: &str) -> Result<(), StorageError> {
        if flag.load(Ordering::SeqCst) {
            Err(StorageError::Backend(format!("{what} rejected: quota exceeded")))
        } else {
            Ok(())
        }
    }
}

impl KeyValueBackend for FlakyBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::check(&self.fail_reads, "read")?;
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::check(&self.fail_writes, "write")?;
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        Self::check(&self.fail_writes, "remove")?;
        self.inner.remove_item(key)
    }
}

pub fn flaky_store() -> ReportStore<FlakyBackend> {
    report_core::init();
    ReportStore::new(FlakyBackend::default())
}

/// File-backed store rooted in a fresh temporary directory. Keep the guard alive.
pub fn file_store() -> (ReportStore<JsonFileBackend>, TempDir) {
    report_core::init();
    let temp = TempDir::new().expect("create temp dir");
    let backend =
        JsonFileBackend::new(temp.path().join("reports.json")).expect("create file backend");
    (ReportStore::new(backend), temp)
}
