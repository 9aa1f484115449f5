//! # Shared Types Crate
//!
//! Domain entities shared by every Real You service.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: the tag enumeration defined here is the only
//!   list of tags. Store keys, sender identities and notification templates
//!   are all derived from it.
//! - **Records are opaque once written**: a subscription record is persisted as
//!   `"<address>,<signature>,<timestamp>"` and replayed verbatim.

pub mod address;
pub mod errors;
pub mod record;
pub mod tag;

pub use address::{keccak256, Address, Hash};
pub use errors::*;
pub use record::{
    address_prefix, subscription_key, subscription_key_for_label, SubscriptionRecord,
    RECORD_DELIMITER,
};
pub use tag::Tag;
