//! # RocksDB Set Store
//!
//! Each set member is its own key, `<set-key> 0x00 <member>`, with an empty
//! value. Listing a set is a prefix scan over `<set-key> 0x00`, which returns
//! members in byte order.
//!
//! Set keys never contain `0x00`, so one set's prefix cannot match another's.

use crate::ports::outbound::{SetStore, StoreError};
use parking_lot::RwLock;
use rocksdb::{Direction, IteratorMode, Options, WriteOptions, DB};
use std::path::Path;
use tracing::info;

const SEPARATOR: u8 = 0x00;

/// RocksDB configuration.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: String,
    /// Block cache size in bytes (default: 32MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 16MB)
    pub write_buffer_size: usize,
    /// fsync after each write (default: true)
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: "./data/subscriptions".to_string(),
            block_cache_size: 32 * 1024 * 1024,
            write_buffer_size: 16 * 1024 * 1024,
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    /// Create config for testing (smaller buffers, no sync)
    pub fn for_testing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 4 * 1024 * 1024,
            write_buffer_size: 1024 * 1024,
            sync_writes: false,
        }
    }
}

/// RocksDB-backed set store.
pub struct RocksDbSetStore {
    // Writers take the write lock so the membership check and put are one step.
    db: RwLock<DB>,
    config: RocksDbConfig,
}

impl RocksDbSetStore {
    /// Open or create the database.
    pub fn open(config: RocksDbConfig) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let db = DB::open(&opts, &config.path).map_err(|e| StoreError::Open {
            message: format!("Failed to open RocksDB at {}: {}", config.path, e),
        })?;

        info!(path = %config.path, "Subscription store opened");

        Ok(Self {
            db: RwLock::new(db),
            config,
        })
    }

    /// Open with default settings at `path`.
    pub fn open_default(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open(RocksDbConfig {
            path: path.as_ref().to_string_lossy().to_string(),
            ..Default::default()
        })
    }

    fn set_prefix(key: &str) -> Vec<u8> {
        let mut prefix = Vec::with_capacity(key.len() + 1);
        prefix.extend_from_slice(key.as_bytes());
        prefix.push(SEPARATOR);
        prefix
    }

    fn member_key(key: &str, member: &str) -> Vec<u8> {
        let mut full = Self::set_prefix(key);
        full.extend_from_slice(member.as_bytes());
        full
    }
}

impl SetStore for RocksDbSetStore {
    fn sadd(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        let full_key = Self::member_key(key, member);
        let db = self.db.write();

        let exists = db
            .get_pinned(&full_key)
            .map_err(|e| StoreError::Io {
                message: format!("RocksDB exists check failed: {}", e),
            })?
            .is_some();
        if exists {
            return Ok(false);
        }

        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);
        db.put_opt(&full_key, b"", &write_opts)
            .map_err(|e| StoreError::Io {
                message: format!("RocksDB put failed: {}", e),
            })?;
        Ok(true)
    }

    fn smembers(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let prefix = Self::set_prefix(key);
        let db = self.db.read();
        let mut members = Vec::new();

        for item in db.iterator(IteratorMode::From(&prefix, Direction::Forward)) {
            let (stored_key, _) = item.map_err(|e| StoreError::Io {
                message: format!("RocksDB scan failed: {}", e),
            })?;
            if !stored_key.starts_with(&prefix) {
                break;
            }
            let member = std::str::from_utf8(&stored_key[prefix.len()..]).map_err(|e| {
                StoreError::Corrupt {
                    message: format!("member under {} is not UTF-8: {}", key, e),
                }
            })?;
            members.push(member.to_string());
        }

        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> RocksDbSetStore {
        let path = dir.path().to_string_lossy().to_string();
        RocksDbSetStore::open(RocksDbConfig::for_testing(path)).unwrap()
    }

    #[test]
    fn test_add_and_list() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        assert!(store.sadd("subscriptions:Food", "0xB,s,2").unwrap());
        assert!(store.sadd("subscriptions:Food", "0xA,s,1").unwrap());
        assert!(!store.sadd("subscriptions:Food", "0xA,s,1").unwrap());

        assert_eq!(
            store.smembers("subscriptions:Food").unwrap(),
            vec!["0xA,s,1", "0xB,s,2"]
        );
    }

    #[test]
    fn test_sets_are_isolated() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store.sadd("subscriptions:Pets", "0xA,s,1").unwrap();
        store.sadd("subscriptions:Pet", "0xB,s,1").unwrap();

        assert_eq!(store.smembers("subscriptions:Pets").unwrap(), vec!["0xA,s,1"]);
        assert_eq!(store.smembers("subscriptions:Pet").unwrap(), vec!["0xB,s,1"]);
        assert!(store.smembers("subscriptions:Food").unwrap().is_empty());
    }

    #[test]
    fn test_members_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = open_store(&dir);
            store.sadd("subscriptions:Art & Fashion", "0xA,s,1").unwrap();
        }
        let store = open_store(&dir);
        assert_eq!(
            store.smembers("subscriptions:Art & Fashion").unwrap(),
            vec!["0xA,s,1"]
        );
    }
}
