//! Durable client-side key/value storage
//!
//! Only one key is used: the most recently submitted name, read back once at
//! startup to replay the last submission. Storage is best-effort; callers log
//! and carry on when it fails.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Key holding the last submitted smoothie name
pub const LAST_NAME_KEY: &str = "smoothieName";

pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Session-only storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object on disk, rewritten whole on every `set`
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStorage { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| Error::Storage(format!("{}: {}", self.path.display(), e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(Error::Storage(format!("{}: {}", self.path.display(), e))),
        }
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_all() {
            Ok(mut values) => values.remove(key),
            Err(e) => {
                tracing::warn!(error = %e, "storage unreadable");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        // a corrupt file is replaced rather than blocking the write
        let mut values = self.read_all().unwrap_or_default();
        values.insert(key.to_string(), value.to_string());

        let text = serde_json::to_string_pretty(&values)
            .map_err(|e| Error::Storage(e.to_string()))?;
        std::fs::write(&self.path, text)
            .map_err(|e| Error::Storage(format!("{}: {}", self.path.display(), e)))
    }
}
