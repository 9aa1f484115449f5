//! # Notification Dispatcher
//!
//! Asks the session which subscribers can receive messages, then walks them
//! one at a time:
//!
//! ```text
//! member ─→ parse record ─→ consent proof ─→ open channel ─→ send ─→ pace
//!              │                 │                 │            │
//!              └──── failure recorded, loop continues ──────────┘
//! ```
//!
//! Every transport call is bounded by the per-call timeout, so one stuck peer
//! fails alone instead of stalling the batch.

use crate::domain::config::{DispatchConfig, RetryPolicy};
use crate::domain::errors::{DeliveryFailure, DispatchError, TransportError};
use crate::domain::report::{DeliveryOutcome, DispatchReport, SubscriberDelivery};
use crate::domain::senders::TagSenderRegistry;
use crate::domain::templates::message_for;
use crate::ports::outbound::{ChannelId, MessagingSession, MessagingTransport, SubscriberDirectory};
use ry_01_consent_codec::build_consent_proof;
use shared_types::SubscriptionRecord;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Sends a tag's notification to every subscriber.
pub struct NotificationDispatcher {
    directory: Arc<dyn SubscriberDirectory>,
    transport: Arc<dyn MessagingTransport>,
    senders: Arc<TagSenderRegistry>,
    config: DispatchConfig,
}

impl NotificationDispatcher {
    pub fn new(
        directory: Arc<dyn SubscriberDirectory>,
        transport: Arc<dyn MessagingTransport>,
        senders: Arc<TagSenderRegistry>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            directory,
            transport,
            senders,
            config,
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn senders(&self) -> &TagSenderRegistry {
        &self.senders
    }

    /// Dispatch with the configured retry policy.
    pub async fn dispatch(&self, label: &str) -> Result<DispatchReport, DispatchError> {
        self.dispatch_with_retry(label, self.config.retry).await
    }

    /// Notify every subscriber of `label`.
    ///
    /// Per-subscriber failures are recorded in the report. Only failing to read
    /// the subscribers or to open the session aborts the dispatch.
    pub async fn dispatch_with_retry(
        &self,
        label: &str,
        retry: RetryPolicy,
    ) -> Result<DispatchReport, DispatchError> {
        let text = message_for(label);
        let sender = self.senders.resolve(label);
        let members = self
            .directory
            .subscribers(label)
            .await
            .map_err(|source| DispatchError::Directory {
                label: label.to_string(),
                source,
            })?;

        info!(
            tag = %label,
            sender = %sender.address(),
            subscribers = members.len(),
            "Dispatching notifications"
        );

        let mut session = self
            .bounded(self.transport.connect(sender))
            .await
            .map_err(DispatchError::Session)?;

        let reachable = self.reachable(session.as_mut(), label, &members).await;

        let mut deliveries = Vec::with_capacity(members.len());
        for (member, reachable) in members.iter().zip(reachable) {
            let delivery = if reachable {
                self.deliver(session.as_mut(), member, &text, retry).await
            } else {
                let address = SubscriptionRecord::address_of(member).to_string();
                warn!(peer = %address, "Peer cannot receive messages, skipping");
                failed(address, DeliveryFailure::Unreachable, 0)
            };
            deliveries.push(delivery);

            if !self.config.pacing.is_zero() {
                tokio::time::sleep(self.config.pacing).await;
            }
        }

        if let Err(e) = self.bounded(session.close()).await {
            warn!(tag = %label, error = %e, "Failed to close messaging session");
        }

        let report = DispatchReport {
            label: label.to_string(),
            sender: sender.address(),
            text,
            deliveries,
        };
        info!(
            tag = %label,
            delivered = report.delivered_count(),
            failed = report.failed_count(),
            "Dispatch complete"
        );
        Ok(report)
    }

    /// One reachability flag per member. A failed lookup treats every peer
    /// as reachable and leaves the outcome to the sends themselves.
    async fn reachable(
        &self,
        session: &mut dyn MessagingSession,
        label: &str,
        members: &[String],
    ) -> Vec<bool> {
        let peers: Vec<String> = members
            .iter()
            .map(|member| SubscriptionRecord::address_of(member).to_string())
            .collect();

        match self.bounded(session.can_message(&peers)).await {
            Ok(flags) if flags.len() == peers.len() => flags,
            Ok(flags) => {
                warn!(
                    tag = %label,
                    expected = peers.len(),
                    got = flags.len(),
                    "Reachability lookup returned the wrong number of peers"
                );
                vec![true; peers.len()]
            }
            Err(e) => {
                warn!(tag = %label, error = %e, "Reachability lookup failed");
                vec![true; peers.len()]
            }
        }
    }

    async fn deliver(
        &self,
        session: &mut dyn MessagingSession,
        member: &str,
        text: &str,
        retry: RetryPolicy,
    ) -> SubscriberDelivery {
        let address = SubscriptionRecord::address_of(member).to_string();

        let record = match SubscriptionRecord::parse(member) {
            Ok(record) => record,
            Err(e) => {
                error!(peer = %address, error = %e, "Skipping unreadable subscription record");
                return failed(address, DeliveryFailure::InvalidRecord(e), 0);
            }
        };

        let proof = match build_consent_proof(&record.consent_signature, record.consent_timestamp) {
            Ok(proof) => proof,
            Err(e) => {
                error!(peer = %address, error = %e, "Skipping subscriber with unusable consent");
                return failed(address, DeliveryFailure::InvalidProof(e), 0);
            }
        };

        let mut attempts = 1;
        let result = match (self.send_once(session, &address, &proof, text).await, retry) {
            (Err(e), RetryPolicy::OnceAfter(delay)) => {
                warn!(peer = %address, error = %e, wait = ?delay, "Send failed, retrying once");
                tokio::time::sleep(delay).await;
                attempts += 1;
                self.send_once(session, &address, &proof, text).await
            }
            (result, _) => result,
        };

        match result {
            Ok(channel) => {
                info!(peer = %address, channel = %channel, attempts, "Sent message");
                SubscriberDelivery {
                    address,
                    outcome: DeliveryOutcome::Delivered,
                    attempts,
                }
            }
            Err(e) => {
                error!(peer = %address, error = %e, attempts, "Error sending message");
                failed(address, DeliveryFailure::Transport(e), attempts)
            }
        }
    }

    async fn send_once(
        &self,
        session: &mut dyn MessagingSession,
        peer: &str,
        proof: &[u8],
        text: &str,
    ) -> Result<ChannelId, TransportError> {
        let channel = self.bounded(session.open_channel(peer, proof)).await?;
        debug!(peer = %peer, channel = %channel, "Channel open");
        self.bounded(session.send(&channel, text)).await?;
        Ok(channel)
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, TransportError>>,
    ) -> Result<T, TransportError> {
        bounded(self.config.transport_timeout, call).await
    }
}

async fn bounded<T>(
    limit: Duration,
    call: impl Future<Output = Result<T, TransportError>>,
) -> Result<T, TransportError> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::Timeout(limit)),
    }
}

fn failed(address: String, failure: DeliveryFailure, attempts: u32) -> SubscriberDelivery {
    SubscriberDelivery {
        address,
        outcome: DeliveryOutcome::Failed(failure),
        attempts,
    }
}
