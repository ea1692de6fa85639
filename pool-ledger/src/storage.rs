//! Persistence port
//!
//! The application state is persisted as an opaque JSON blob under a fixed
//! key. The core computation never touches storage; only
//! [`crate::state::PoolSession`] does, at startup and after every mutation.
//!
//! # Stores
//!
//! - [`MemoryStore`] - process-local map, used in tests and embeddings
//! - [`RocksStore`] - RocksDB database under a data directory

use crate::{
    error::{Error, Result},
    Config,
};
use parking_lot::RwLock;
use rocksdb::{BoundColumnFamily, ColumnFamilyDescriptor, Options, WriteOptions, DB};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Column family holding persisted state
const CF_STATE: &str = "state";

/// Key the application state is stored under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "poker-pool-calculator-state";

/// Key-value persistence port
pub trait StateStore {
    /// Load value for key, `None` if never saved
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Save value under key, replacing any previous value
    fn save(&self, key: &str, value: &str) -> Result<()>;

    /// Remove key; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: StateStore + ?Sized> StateStore for &S {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<S: StateStore + ?Sized> StateStore for Box<S> {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl StateStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// RocksDB-backed store
///
/// Keys and values live in the `state` column family; values are the
/// UTF-8 JSON text handed to [`StateStore::save`].
pub struct RocksStore {
    db: Arc<DB>,
    path: PathBuf,
}

impl RocksStore {
    /// Open or create store at the configured data directory
    pub fn open(config: &Config) -> Result<Self> {
        Self::open_dir(&config.data_dir)
    }

    /// Open or create store at a directory
    pub fn open_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().to_path_buf();

        // Create directory if not exists
        std::fs::create_dir_all(&path)?;

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        let cf_descriptors = vec![ColumnFamilyDescriptor::new(CF_STATE, Self::cf_options_state())];
        let db = DB::open_cf_descriptors(&db_opts, &path, cf_descriptors)?;

        tracing::info!("Opened state store at {:?}", path);

        Ok(Self {
            db: Arc::new(db),
            path,
        })
    }

    /// Database directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn cf_handle(&self) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(CF_STATE)
            .ok_or_else(|| Error::Storage(format!("Column family {} not found", CF_STATE)))
    }

    fn cf_options_state() -> Options {
        let mut opts = Options::default();
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts
    }

    fn write_options() -> WriteOptions {
        let mut opts = WriteOptions::default();
        opts.set_sync(true);
        opts
    }
}

impl fmt::Debug for RocksStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RocksStore").field("path", &self.path).finish()
    }
}

impl StateStore for RocksStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let cf = self.cf_handle()?;

        match self.db.get_cf(&cf, key.as_bytes())? {
            Some(bytes) => {
                let value = String::from_utf8(bytes)
                    .map_err(|e| Error::Storage(format!("Value for {:?} is not UTF-8: {}", key, e)))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let cf = self.cf_handle()?;

        self.db
            .put_cf_opt(&cf, key.as_bytes(), value.as_bytes(), &Self::write_options())?;

        tracing::debug!("Saved {} bytes under {}", value.len(), key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let cf = self.cf_handle()?;

        self.db
            .delete_cf_opt(&cf, key.as_bytes(), &Self::write_options())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.load("k").unwrap(), None);

        store.save("k", "v1").unwrap();
        store.save("k", "v2").unwrap();
        assert_eq!(store.load("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_rocks_store_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("state");

        {
            let store = RocksStore::open_dir(&path).unwrap();
            assert_eq!(store.load(DEFAULT_STORAGE_KEY).unwrap(), None);
            store.save(DEFAULT_STORAGE_KEY, "{\"players\":[]}").unwrap();
            assert_eq!(
                store.load(DEFAULT_STORAGE_KEY).unwrap().as_deref(),
                Some("{\"players\":[]}")
            );
        }

        // Reopening sees the same data
        let reopened = RocksStore::open_dir(&path).unwrap();
        assert_eq!(reopened.path(), path.as_path());
        assert!(reopened.load(DEFAULT_STORAGE_KEY).unwrap().is_some());

        reopened.remove(DEFAULT_STORAGE_KEY).unwrap();
        reopened.remove(DEFAULT_STORAGE_KEY).unwrap();
        assert_eq!(reopened.load(DEFAULT_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_rocks_store_keys_independent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = RocksStore::open_dir(temp_dir.path()).unwrap();

        store.save("pool-a", "1").unwrap();
        store.save("pool-b", "2").unwrap();
        store.save("pool-a", "3").unwrap();

        assert_eq!(store.load("pool-a").unwrap().as_deref(), Some("3"));
        assert_eq!(store.load("pool-b").unwrap().as_deref(), Some("2"));
        assert_eq!(store.load("pool-c").unwrap(), None);
    }

    #[test]
    fn test_session_over_rocks_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: temp_dir.path().join("pool"),
            ..Config::default()
        };

        {
            let store = RocksStore::open(&config).unwrap();
            let mut session = crate::PoolSession::load(store, config.clone()).unwrap();
            session.add_player("Alice").unwrap();
            session.add_player("Bob").unwrap();
        }

        let store = RocksStore::open(&config).unwrap();
        let session = crate::PoolSession::load(store, config).unwrap();
        assert_eq!(session.players().len(), 2);
        assert_eq!(session.players()[0].name, "Alice");
    }
}
