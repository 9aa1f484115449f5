//! # RY-02 Subscription Store
//!
//! Maps each tag to the set of subscription records consented for it.
//!
//! ```text
//! subscriptions:Food ─→ { "0xABC,sig1,1700000000000", "0xDEF,sig2,1700000001000" }
//! subscriptions:Pets ─→ { "0xABC,sig3,1700000002000" }
//! ```
//!
//! Members are opaque strings with set semantics: adding an identical record
//! twice leaves one entry. Records are never updated or deleted.
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `ports/` - the `SetStore` backend trait
//! - `adapters/` - in-memory and RocksDB backends
//! - `service.rs` - `SubscriptionStore`, the tag-aware API over a backend
//!
//! ## Usage
//!
//! ```
//! use ry_02_subscription_store::{InMemorySetStore, SubscriptionStore};
//! use shared_types::{SubscriptionRecord, Tag};
//! use std::sync::Arc;
//!
//! let store = SubscriptionStore::new(Arc::new(InMemorySetStore::new()));
//! let record = SubscriptionRecord::new("0xABC", "sig1", 1_700_000_000_000).unwrap();
//! store.add(Tag::Food, &record).unwrap();
//!
//! assert_eq!(store.list_tags_for_address("0xABC").unwrap(), vec![Tag::Food]);
//! ```

pub mod adapters;
pub mod ports;
pub mod service;

pub use adapters::memory::InMemorySetStore;
#[cfg(feature = "rocksdb")]
pub use adapters::rocksdb::{RocksDbConfig, RocksDbSetStore};
pub use ports::outbound::{SetStore, StoreError};
pub use service::SubscriptionStore;
