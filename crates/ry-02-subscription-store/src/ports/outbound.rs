//! # Outbound Ports
//!
//! The storage SPI. Any backend that offers Redis-style set semantics can hold
//! subscriptions.

use thiserror::Error;

/// Storage backend failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Backend could not be opened.
    #[error("Failed to open store: {message}")]
    Open { message: String },

    /// Read or write failed.
    #[error("Store I/O error: {message}")]
    Io { message: String },

    /// Stored bytes are not a valid member.
    #[error("Corrupt store entry: {message}")]
    Corrupt { message: String },
}

/// Unordered string sets addressed by key.
///
/// Production: `RocksDbSetStore`
/// Testing: `InMemorySetStore`
pub trait SetStore: Send + Sync {
    /// Add `member` to the set at `key`. Returns `true` if it was not present.
    fn sadd(&self, key: &str, member: &str) -> Result<bool, StoreError>;

    /// All members of the set at `key`, sorted. Missing sets are empty.
    fn smembers(&self, key: &str) -> Result<Vec<String>, StoreError>;
}
