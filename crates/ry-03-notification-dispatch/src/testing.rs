//! In-process transport that records every call. Used by tests across the
//! workspace.

use crate::domain::errors::TransportError;
use crate::ports::outbound::{ChannelId, MessagingSession, MessagingTransport};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_crypto::Wallet;
use shared_types::Address;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// A channel that was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedChannel {
    pub sender: Address,
    pub peer: String,
    pub consent_proof: Vec<u8>,
}

/// A message that was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub sender: Address,
    pub peer: String,
    pub text: String,
}

#[derive(Default)]
struct State {
    connects: Vec<Address>,
    channels: Vec<OpenedChannel>,
    messages: Vec<SentMessage>,
    closes: usize,
    // Remaining forced failures per peer
    failures: HashMap<String, u32>,
    stalls: HashMap<String, Duration>,
    unreachable: HashSet<String>,
    reachability_checks: Vec<Vec<String>>,
}

/// Recording transport.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    state: Arc<Mutex<State>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next `times` channel opens to `peer`.
    pub fn fail_peer(&self, peer: &str, times: u32) {
        self.state.lock().failures.insert(peer.to_string(), times);
    }

    /// Delay every channel open to `peer` by `delay`.
    pub fn stall_peer(&self, peer: &str, delay: Duration) {
        self.state.lock().stalls.insert(peer.to_string(), delay);
    }

    /// Report `peer` as unable to receive messages.
    pub fn unreachable_peer(&self, peer: &str) {
        self.state.lock().unreachable.insert(peer.to_string());
    }

    /// Peer lists passed to each reachability lookup.
    pub fn reachability_checks(&self) -> Vec<Vec<String>> {
        self.state.lock().reachability_checks.clone()
    }

    pub fn connects(&self) -> Vec<Address> {
        self.state.lock().connects.clone()
    }

    pub fn channels(&self) -> Vec<OpenedChannel> {
        self.state.lock().channels.clone()
    }

    pub fn messages(&self) -> Vec<SentMessage> {
        self.state.lock().messages.clone()
    }

    pub fn closes(&self) -> usize {
        self.state.lock().closes
    }
}

#[async_trait]
impl MessagingTransport for RecordingTransport {
    async fn connect(&self, sender: &Wallet) -> Result<Box<dyn MessagingSession>, TransportError> {
        self.state.lock().connects.push(sender.address());
        Ok(Box::new(RecordingSession {
            sender: sender.address(),
            state: self.state.clone(),
            peers: HashMap::new(),
        }))
    }
}

struct RecordingSession {
    sender: Address,
    state: Arc<Mutex<State>>,
    peers: HashMap<ChannelId, String>,
}

#[async_trait]
impl MessagingSession for RecordingSession {
    async fn can_message(&mut self, peers: &[String]) -> Result<Vec<bool>, TransportError> {
        let mut state = self.state.lock();
        state.reachability_checks.push(peers.to_vec());
        Ok(peers
            .iter()
            .map(|peer| !state.unreachable.contains(peer))
            .collect())
    }

    async fn open_channel(
        &mut self,
        peer: &str,
        consent_proof: &[u8],
    ) -> Result<ChannelId, TransportError> {
        let stall = self.state.lock().stalls.get(peer).copied();
        if let Some(delay) = stall {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock();
        if let Some(remaining) = state.failures.get_mut(peer) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(TransportError::Rejected {
                    status: 429,
                    message: format!("rate limited: {}", peer),
                });
            }
        }

        state.channels.push(OpenedChannel {
            sender: self.sender,
            peer: peer.to_string(),
            consent_proof: consent_proof.to_vec(),
        });
        let id = ChannelId(format!("{}-{}", peer, state.channels.len()));
        self.peers.insert(id.clone(), peer.to_string());
        Ok(id)
    }

    async fn send(&mut self, channel: &ChannelId, text: &str) -> Result<(), TransportError> {
        let peer = self
            .peers
            .get(channel)
            .cloned()
            .ok_or_else(|| TransportError::InvalidResponse(format!("unknown channel {}", channel)))?;
        self.state.lock().messages.push(SentMessage {
            sender: self.sender,
            peer,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.state.lock().closes += 1;
        Ok(())
    }
}
