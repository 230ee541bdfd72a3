//! Small key-value persistence used to remember the current card.
//!
//! `FileStore` keeps one TOML map per dataset under the cache directory, using
//! a hash of the dataset identity as the directory name to avoid filesystem
//! issues.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const WORD_INDEX_KEY: &str = "word-index";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::default();
        store.values.insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// TOML-backed store; every `set` rewrites the whole file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`. An unreadable or corrupt
    /// file starts empty.
    pub fn open(path: PathBuf) -> Self {
        let values = match fs::read_to_string(&path) {
            Ok(data) => toml::from_str(&data).unwrap_or_else(|err| {
                warn!(path = %path.display(), "Ignoring corrupt store file: {err}");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        debug!(path = %path.display(), keys = values.len(), "Opened key-value store");
        Self { path, values }
    }

    /// Store for a given dataset identity under `cache_dir`.
    pub fn for_dataset(cache_dir: &Path, dataset_id: &str) -> Self {
        Self::open(hash_dir(cache_dir, dataset_id).join("store.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Creating store directory {}", parent.display()))?;
        }
        let contents = toml::to_string(&self.values).context("Serializing store")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Writing store {}", self.path.display()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

pub fn hash_dir(cache_dir: &Path, dataset_id: &str) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(dataset_id.as_bytes());
    let hash = format!("{:x}", hasher.finalize());
    cache_dir.join(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_store_survives_reopen() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = FileStore::for_dataset(dir.path(), "bundled");
        store.set(WORD_INDEX_KEY, "7").expect("write");

        let reopened = FileStore::for_dataset(dir.path(), "bundled");
        assert_eq!(reopened.get(WORD_INDEX_KEY).as_deref(), Some("7"));
    }

    #[test]
    fn datasets_get_separate_stores() {
        let dir = TempDir::new().expect("tempdir");
        let mut first = FileStore::for_dataset(dir.path(), "a.json");
        first.set(WORD_INDEX_KEY, "3").expect("write");

        let second = FileStore::for_dataset(dir.path(), "b.json");
        assert_ne!(first.path(), second.path());
        assert!(second.get(WORD_INDEX_KEY).is_none());
    }

    #[test]
    fn corrupt_file_opens_empty() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("store.toml");
        fs::write(&path, "not = [valid").expect("write");

        let store = FileStore::open(path);
        assert!(store.get(WORD_INDEX_KEY).is_none());
    }

    #[test]
    fn memory_store_round_trips_values() {
        let mut store = MemoryStore::new();
        assert!(store.get("k").is_none());
        store.set("k", "v").expect("set");
        assert_eq!(store.get("k").as_deref(), Some("v"));
    }
}
