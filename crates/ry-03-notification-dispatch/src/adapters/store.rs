//! Subscriber directory backed by the subscription store.
//!
//! Store reads may hit RocksDB, so they run on the blocking pool.

use crate::ports::outbound::SubscriberDirectory;
use async_trait::async_trait;
use ry_02_subscription_store::{StoreError, SubscriptionStore};

#[async_trait]
impl SubscriberDirectory for SubscriptionStore {
    async fn subscribers(&self, label: &str) -> Result<Vec<String>, StoreError> {
        let store = self.clone();
        let label = label.to_string();
        tokio::task::spawn_blocking(move || store.list_subscribers_by_label(&label))
            .await
            .map_err(|e| StoreError::Io {
                message: e.to_string(),
            })?
    }
}
