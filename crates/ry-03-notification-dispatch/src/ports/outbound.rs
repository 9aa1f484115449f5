//! # Outbound Ports
//!
//! The messaging network and the subscriber source.

use crate::domain::errors::TransportError;
use async_trait::async_trait;
use ry_02_subscription_store::StoreError;
use shared_crypto::Wallet;
use std::fmt;

/// Transport-assigned conversation id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelId(pub String);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Messaging network able to carry consented direct messages.
#[async_trait]
pub trait MessagingTransport: Send + Sync {
    /// Open a session acting as `sender`.
    async fn connect(&self, sender: &Wallet) -> Result<Box<dyn MessagingSession>, TransportError>;
}

/// A sender's connection to the messaging network. Lives for one dispatch.
#[async_trait]
pub trait MessagingSession: Send {
    /// Whether each of `peers` can receive messages, in order. Transports
    /// without a reachability lookup report every peer as reachable.
    async fn can_message(&mut self, peers: &[String]) -> Result<Vec<bool>, TransportError> {
        Ok(vec![true; peers.len()])
    }

    /// Open (or reuse) a channel to `peer`, presenting the peer's consent proof.
    /// The transport may reject a proof it cannot accept.
    async fn open_channel(
        &mut self,
        peer: &str,
        consent_proof: &[u8],
    ) -> Result<ChannelId, TransportError>;

    /// Send a text message on an open channel.
    async fn send(&mut self, channel: &ChannelId, text: &str) -> Result<(), TransportError>;

    /// Release the session.
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Source of stored subscription members for a tag label.
#[async_trait]
pub trait SubscriberDirectory: Send + Sync {
    /// Raw members for `label`. Labels outside the tag set have none.
    async fn subscribers(&self, label: &str) -> Result<Vec<String>, StoreError>;
}
