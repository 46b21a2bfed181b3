use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Storage file is corrupt: {0}")]
    Corrupt(String),
}

/// Durable string key-value storage. Cells persist small flags and records
/// through this seam instead of touching files or ambient state directly.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// ==============================================================================
// FILE-BACKED STORE
// ==============================================================================

/// JSON-file-backed store. The whole map is cached in memory and written
/// through on every mutation (temp file + rename, so a crash mid-write leaves
/// the previous snapshot intact).
pub struct FileStore {
    path: PathBuf,
    cache: RwLock<HashMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let cache = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| StorageError::Corrupt(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No storage file at {}, starting empty", path.display());
                HashMap::new()
            }
            Err(e) => return Err(StorageError::Io(e.to_string())),
        };

        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    fn persist(&self, snapshot: &HashMap<String, String>) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(snapshot)
            .map_err(|e| StorageError::Io(e.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, raw).map_err(|e| StorageError::Io(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| StorageError::Io(e.to_string()))?;

        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let cache = self
            .cache
            .read()
            .map_err(|_| StorageError::Io("storage lock poisoned".to_string()))?;
        Ok(cache.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut cache = self
            .cache
            .write()
            .map_err(|_| StorageError::Io("storage lock poisoned".to_string()))?;
        cache.insert(key.to_string(), value.to_string());
        self.persist(&cache)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut cache = self
            .cache
            .write()
            .map_err(|_| StorageError::Io("storage lock poisoned".to_string()))?;
        if cache.remove(key).is_none() {
            warn!("Removing absent storage key: {}", key);
        }
        self.persist(&cache)
    }
}

// ==============================================================================
// IN-MEMORY STORE (tests and ephemeral runs)
// ==============================================================================

#[derive(Default)]
pub struct MemoryStore {
    cache: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let cache = self
            .cache
            .read()
            .map_err(|_| StorageError::Io("storage lock poisoned".to_string()))?;
        Ok(cache.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut cache = self
            .cache
            .write()
            .map_err(|_| StorageError::Io("storage lock poisoned".to_string()))?;
        cache.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut cache = self
            .cache
            .write()
            .map_err(|_| StorageError::Io("storage lock poisoned".to_string()))?;
        cache.remove(key);
        Ok(())
    }
}
