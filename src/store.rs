//! Local key-value blob persistence.
//!
//! The engine holds no global state; durability is delegated to a
//! [`BlobStore`] injected at session construction. Values are opaque JSON
//! strings keyed the same way the original persisted layout is keyed. A
//! missing or corrupt blob falls back to defaults and is logged, never
//! fatal: the session keeps operating in memory.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::errors::{StockError, StockResult};
use crate::models::{AppSettings, StockItem};
use crate::registry::Registry;

pub const ITEMS_KEY: &str = "stocktake_items";
pub const CATEGORIES_KEY: &str = "stocktake_categories";
pub const LOCATIONS_KEY: &str = "stocktake_locations";
pub const SETTINGS_KEY: &str = "stocktake_settings";

const ALL_KEYS: [&str; 4] = [ITEMS_KEY, CATEGORIES_KEY, LOCATIONS_KEY, SETTINGS_KEY];

/// Key-value blob store boundary.
pub trait BlobStore {
    fn get(&self, key: &str) -> StockResult<Option<String>>;
    fn put(&mut self, key: &str, value: &str) -> StockResult<()>;
    fn delete(&mut self, key: &str) -> StockResult<()>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    blobs: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> StockResult<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> StockResult<()> {
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> StockResult<()> {
        self.blobs.remove(key);
        Ok(())
    }
}

/// One JSON file per key under a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates the data directory if it does not exist.
    pub fn open(dir: impl AsRef<Path>) -> StockResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: &str) -> StockResult<Option<String>> {
        match fs::read_to_string(self.blob_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StockError::Storage(err.to_string())),
        }
    }

    fn put(&mut self, key: &str, value: &str) -> StockResult<()> {
        fs::write(self.blob_path(key), value)?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> StockResult<()> {
        match fs::remove_file(self.blob_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StockError::Storage(err.to_string())),
        }
    }
}

fn load_or_default<T, F>(store: &dyn BlobStore, key: &str, default: F) -> T
where
    T: serde::de::DeserializeOwned,
    F: FnOnce() -> T,
{
    match store.get(key) {
        Ok(Some(blob)) => match serde_json::from_str(&blob) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "corrupt blob, falling back to defaults");
                default()
            }
        },
        Ok(None) => default(),
        Err(err) => {
            warn!(key, error = %err, "blob store unavailable, falling back to defaults");
            default()
        }
    }
}

pub fn load_items(store: &dyn BlobStore) -> Vec<StockItem> {
    load_or_default(store, ITEMS_KEY, Vec::new)
}

pub fn load_categories(store: &dyn BlobStore) -> Registry {
    let registry = load_or_default(store, CATEGORIES_KEY, Registry::default_categories);
    non_empty_or(registry, CATEGORIES_KEY, Registry::default_categories)
}

pub fn load_locations(store: &dyn BlobStore) -> Registry {
    let registry = load_or_default(store, LOCATIONS_KEY, Registry::default_locations);
    non_empty_or(registry, LOCATIONS_KEY, Registry::default_locations)
}

// A persisted empty registry would make the never-empty invariant
// unrestorable, so it loads as the default set instead.
fn non_empty_or(registry: Registry, key: &str, default: fn() -> Registry) -> Registry {
    if registry.is_empty() {
        warn!(key, "empty registry blob, falling back to defaults");
        default()
    } else {
        registry
    }
}

pub fn load_settings(store: &dyn BlobStore) -> AppSettings {
    load_or_default(store, SETTINGS_KEY, AppSettings::default)
}

pub fn save_items(store: &mut dyn BlobStore, items: &[StockItem]) -> StockResult<()> {
    let blob = serde_json::to_string(items)?;
    store.put(ITEMS_KEY, &blob)
}

pub fn save_categories(store: &mut dyn BlobStore, categories: &Registry) -> StockResult<()> {
    let blob = serde_json::to_string(categories)?;
    store.put(CATEGORIES_KEY, &blob)
}

pub fn save_locations(store: &mut dyn BlobStore, locations: &Registry) -> StockResult<()> {
    let blob = serde_json::to_string(locations)?;
    store.put(LOCATIONS_KEY, &blob)
}

pub fn save_settings(store: &mut dyn BlobStore, settings: &AppSettings) -> StockResult<()> {
    let blob = serde_json::to_string(settings)?;
    store.put(SETTINGS_KEY, &blob)
}

/// Drops every persisted blob.
pub fn clear_all(store: &mut dyn BlobStore) -> StockResult<()> {
    for key in ALL_KEYS {
        store.delete(key)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_blobs_yield_defaults() {
        let store = MemoryStore::new();
        assert!(load_items(&store).is_empty());
        assert_eq!(load_categories(&store).len(), 7);
        assert_eq!(load_locations(&store).len(), 7);
        assert_eq!(load_settings(&store), AppSettings::default());
    }

    #[test]
    fn corrupt_blob_falls_back() {
        let mut store = MemoryStore::new();
        store.put(SETTINGS_KEY, "not json").unwrap();
        assert_eq!(load_settings(&store), AppSettings::default());
    }

    #[test]
    fn registries_round_trip_as_plain_arrays() {
        let mut store = MemoryStore::new();
        save_categories(&mut store, &Registry::new(vec!["A".into(), "B".into()])).unwrap();
        let blob = store.get(CATEGORIES_KEY).unwrap().unwrap();
        assert_eq!(blob, r#"["A","B"]"#);
        let back = load_categories(&store);
        assert_eq!(back.names(), &["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn persisted_registry_blob_is_sanitized_on_load() {
        let mut store = MemoryStore::new();
        store.put(CATEGORIES_KEY, r#"["A","A",""]"#).unwrap();
        let registry = load_categories(&store);
        assert_eq!(registry.names(), &["A".to_string()]);
    }

    #[test]
    fn empty_registry_blob_loads_defaults() {
        let mut store = MemoryStore::new();
        store.put(CATEGORIES_KEY, "[]").unwrap();
        store.put(LOCATIONS_KEY, r#"["",""]"#).unwrap();
        assert_eq!(load_categories(&store).len(), 7);
        assert_eq!(load_locations(&store).len(), 7);
    }

    #[test]
    fn clear_all_removes_every_key() {
        let mut store = MemoryStore::new();
        save_settings(&mut store, &AppSettings::default()).unwrap();
        save_items(&mut store, &[]).unwrap();
        clear_all(&mut store).unwrap();
        assert!(store.get(SETTINGS_KEY).unwrap().is_none());
        assert!(store.get(ITEMS_KEY).unwrap().is_none());
    }
}
