//! # Subscription Store Service
//!
//! Tag-aware operations over a `SetStore` backend.

use crate::ports::outbound::{SetStore, StoreError};
use shared_types::{subscription_key, SubscriptionRecord, Tag};
use std::sync::Arc;
use tracing::debug;

/// Subscription store.
#[derive(Clone)]
pub struct SubscriptionStore {
    backend: Arc<dyn SetStore>,
}

impl SubscriptionStore {
    pub fn new(backend: Arc<dyn SetStore>) -> Self {
        Self { backend }
    }

    /// Add `record` to the tag's set. Returns `false` if an identical record
    /// was already stored.
    pub fn add(&self, tag: Tag, record: &SubscriptionRecord) -> Result<bool, StoreError> {
        let added = self.backend.sadd(&subscription_key(tag), &record.encode())?;
        debug!(
            tag = %tag,
            address = %record.subscriber_address,
            added,
            "Subscription stored"
        );
        Ok(added)
    }

    /// Raw members of the tag's set.
    pub fn list_subscribers(&self, tag: Tag) -> Result<Vec<String>, StoreError> {
        self.backend.smembers(&subscription_key(tag))
    }

    /// Raw members for a label. Labels outside the tag enumeration have no
    /// subscribers.
    pub fn list_subscribers_by_label(&self, label: &str) -> Result<Vec<String>, StoreError> {
        match Tag::from_label(label) {
            Some(tag) => self.list_subscribers(tag),
            None => Ok(Vec::new()),
        }
    }

    /// Subscriber addresses for a label, one per stored record.
    pub fn list_subscriber_addresses(&self, label: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .list_subscribers_by_label(label)?
            .iter()
            .map(|raw| SubscriptionRecord::address_of(raw).to_string())
            .collect())
    }

    /// Tags `address` is subscribed to, in enumeration order.
    ///
    /// Scans every tag's set. Addresses are compared exactly as stored.
    pub fn list_tags_for_address(&self, address: &str) -> Result<Vec<Tag>, StoreError> {
        let mut tags = Vec::new();
        for tag in Tag::ALL {
            let members = self.list_subscribers(tag)?;
            if members
                .iter()
                .any(|raw| SubscriptionRecord::belongs_to(raw, address))
            {
                tags.push(tag);
            }
        }
        Ok(tags)
    }
}
