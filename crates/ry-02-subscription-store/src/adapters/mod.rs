//! Set store backends.

pub mod memory;
#[cfg(feature = "rocksdb")]
pub mod rocksdb;
