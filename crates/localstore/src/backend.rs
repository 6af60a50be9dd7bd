//! Storage backends
//!
//! The accessor talks to a synchronous string-keyed store through the
//! `StorageBackend` trait. Two adapters ship with the crate: an in-process
//! map for per-session state and a redb-backed file for state that survives
//! the process.

use crate::error::{StorageError, StorageResult};
use redb::{Database, ReadableTable, TableDefinition};
use std::collections::HashMap;
use std::path::Path;

// Table definition for the file backend
const TABLE: TableDefinition<&str, &str> = TableDefinition::new("storage");

/// Synchronous string-keyed storage in the shape of the web storage API.
pub trait StorageBackend: Send + Sync {
    /// Short backend name used in diagnostics.
    fn name(&self) -> &'static str;

    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()>;

    fn remove_item(&mut self, key: &str) -> StorageResult<()>;

    fn has_item(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get_item(key)?.is_some())
    }
}

/// Per-process backend with no persistence.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    items: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        self.items.remove(key);
        Ok(())
    }

    fn has_item(&self, key: &str) -> StorageResult<bool> {
        Ok(self.items.contains_key(key))
    }
}

/// Persistent backend backed by redb.
pub struct FileBackend {
    db: Database,
}

impl FileBackend {
    /// Open or create a storage database at `path`, creating parent
    /// directories as needed.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StorageError::Backend(e.to_string()))?;
            }
        }

        let db = Database::create(path).map_err(|e| StorageError::Backend(e.to_string()))?;

        // Initialize the table so reads never observe a missing table.
        let write_txn = db
            .begin_write()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        {
            write_txn
                .open_table(TABLE)
                .map_err(|e| StorageError::Backend(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        Ok(Self { db })
    }
}

impl StorageBackend for FileBackend {
    fn name(&self) -> &'static str {
        "file"
    }

    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        let table = read_txn
            .open_table(TABLE)
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        match table.get(key) {
            Ok(Some(guard)) => Ok(Some(guard.value().to_string())),
            Ok(None) => Ok(None),
            Err(e) => Err(StorageError::Backend(e.to_string())),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(TABLE)
                .map_err(|e| StorageError::Backend(e.to_string()))?;
            table
                .insert(key, value)
                .map_err(|e| StorageError::Backend(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(TABLE)
                .map_err(|e| StorageError::Backend(e.to_string()))?;
            table
                .remove(key)
                .map_err(|e| StorageError::Backend(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_basic() {
        let mut backend = MemoryBackend::new();

        backend.set_item("key1", "value1").unwrap();
        assert_eq!(backend.get_item("key1").unwrap(), Some("value1".to_string()));
        assert!(backend.has_item("key1").unwrap());
        assert!(!backend.has_item("nonexistent").unwrap());

        backend.remove_item("key1").unwrap();
        assert!(!backend.has_item("key1").unwrap());

        // Removing a missing key is not an error.
        backend.remove_item("key1").unwrap();
    }

    #[test]
    fn test_file_backend_basic() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = FileBackend::open(dir.path().join("storage.redb")).unwrap();

        backend.set_item("key1", "value1").unwrap();
        assert_eq!(backend.get_item("key1").unwrap(), Some("value1".to_string()));
        assert!(backend.has_item("key1").unwrap());

        backend.remove_item("key1").unwrap();
        assert_eq!(backend.get_item("key1").unwrap(), None);
    }

    #[test]
    fn test_file_backend_reopen_keeps_items() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.redb");

        {
            let mut backend = FileBackend::open(&path).unwrap();
            backend.set_item("key1", "value1").unwrap();
        }

        let backend = FileBackend::open(&path).unwrap();
        assert_eq!(backend.get_item("key1").unwrap(), Some("value1".to_string()));
    }
}
