//! Shared test fixtures.

use async_trait::async_trait;
use parking_lot::Mutex;
use ry_02_subscription_store::{InMemorySetStore, SubscriptionStore};
use ry_04_image_analysis::{AnalysisError, InferenceOracle, OracleContent, OracleMessage};
use ry_05_attestation::{AttestationError, AttestationReceipt, Attestor, PhotoAttestation};
use shared_chain::U256;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Subscriber used by the reference flow.
pub const SUBSCRIBER: &str = "0xABC";
/// Stored consent signature of the reference flow.
pub const SIGNATURE: &str = "sig1";
/// Consent timestamp of the reference flow, Tue, 14 Nov 2023 22:13:20 GMT.
pub const TIMESTAMP_MS: u64 = 1_700_000_000_000;
/// Proof bytes for `(SIGNATURE, TIMESTAMP_MS)`, hex.
pub const REFERENCE_PROOF_HEX: &str = "0a04736967311080d095ffbc311801";

pub fn memory_store() -> SubscriptionStore {
    SubscriptionStore::new(Arc::new(InMemorySetStore::new()))
}

/// Oracle that answers after a fixed number of empty polls.
pub struct ScriptedOracle {
    answer: String,
    pending_polls: u32,
    polls: AtomicU32,
    submitted: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    pub fn new(answer: impl Into<String>, pending_polls: u32) -> Self {
        Self {
            answer: answer.into(),
            pending_polls,
            polls: AtomicU32::new(0),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn polls(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }

    /// Image URLs passed to `start_chat`.
    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().clone()
    }
}

#[async_trait]
impl InferenceOracle for ScriptedOracle {
    async fn start_chat(&self, _prompt: &str, image_urls: &[String]) -> Result<U256, AnalysisError> {
        self.submitted.lock().extend(image_urls.iter().cloned());
        Ok(U256::from(1))
    }

    async fn message_history(&self, _chat_id: U256) -> Result<Vec<OracleMessage>, AnalysisError> {
        let poll = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
        let mut history = vec![OracleMessage {
            role: "user".to_string(),
            content: vec![OracleContent {
                content_type: "text".to_string(),
                value: "prompt".to_string(),
            }],
        }];
        if poll > self.pending_polls {
            history.push(OracleMessage {
                role: "assistant".to_string(),
                content: vec![OracleContent {
                    content_type: "text".to_string(),
                    value: self.answer.clone(),
                }],
            });
        }
        Ok(history)
    }
}

/// Attestor that records requests and hands out sequential ids.
#[derive(Default)]
pub struct RecordingAttestor {
    requests: Mutex<Vec<PhotoAttestation>>,
}

impl RecordingAttestor {
    pub fn requests(&self) -> Vec<PhotoAttestation> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Attestor for RecordingAttestor {
    async fn attest(&self, photo: &PhotoAttestation) -> Result<AttestationReceipt, AttestationError> {
        let mut requests = self.requests.lock();
        requests.push(photo.clone());
        Ok(AttestationReceipt {
            attestation_id: format!("0x{:x}", requests.len()),
            tx_hash: format!("0x{:064x}", requests.len()),
            indexing_value: photo.photo_id.clone(),
        })
    }
}
