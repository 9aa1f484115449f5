//! # Sign Protocol Registry
//!
//! Calls `attest` on the registry contract and reads the new id from the
//! `AttestationMade(uint64 attestationId, string indexingKey)` event.

use crate::domain::attestation::{AttestationReceipt, PhotoAttestation};
use crate::domain::errors::AttestationError;
use crate::domain::schema::{attest_arguments, ATTESTATION_MADE, ATTEST_SIGNATURE};
use crate::ports::outbound::Attestor;
use async_trait::async_trait;
use shared_chain::abi::decode;
use shared_chain::{encode_call, event_topic, ParamType, TransactionSender};
use shared_types::Address;
use std::sync::Arc;
use tracing::info;

/// Public Sepolia RPC.
pub const DEFAULT_ATTESTATION_RPC_URL: &str = "https://ethereum-sepolia-rpc.publicnode.com";
/// Sign Protocol registry on Sepolia.
pub const DEFAULT_ATTESTATION_CONTRACT: &str = "0x878c92FD89d8E0B93Dc0a3c907A2adc7577e39c5";

/// Attestor backed by the Sign Protocol registry.
pub struct SignProtocolAttestor {
    sender: Arc<TransactionSender>,
    contract: Address,
    schema_id: u64,
}

impl SignProtocolAttestor {
    pub fn new(sender: Arc<TransactionSender>, contract: Address, schema_id: u64) -> Self {
        Self {
            sender,
            contract,
            schema_id,
        }
    }
}

#[async_trait]
impl Attestor for SignProtocolAttestor {
    async fn attest(&self, photo: &PhotoAttestation) -> Result<AttestationReceipt, AttestationError> {
        let data = encode_call(
            ATTEST_SIGNATURE,
            &attest_arguments(self.schema_id, self.sender.address(), photo),
        );
        let receipt = self.sender.send(self.contract, data).await?;

        let log = receipt
            .find_log(&self.contract, &event_topic(ATTESTATION_MADE))
            .ok_or_else(|| AttestationError::MissingEvent {
                tx_hash: receipt.transaction_hash.clone(),
            })?;
        let mut fields = decode(&[ParamType::Uint, ParamType::String], &log.data_bytes()?)
            .map_err(|e| AttestationError::Chain(format!("bad AttestationMade data: {}", e)))?
            .into_iter();
        let attestation_id = fields
            .next()
            .ok_or_else(|| AttestationError::Chain("empty AttestationMade data".to_string()))?
            .into_uint()
            .map_err(|e| AttestationError::Chain(e.to_string()))?;

        info!(
            attestation_id = %attestation_id,
            tx_hash = %receipt.transaction_hash,
            photo_id = %photo.photo_id,
            "Attestation recorded"
        );

        Ok(AttestationReceipt {
            attestation_id: format!("0x{:x}", attestation_id),
            tx_hash: receipt.transaction_hash,
            indexing_value: photo.photo_id.clone(),
        })
    }
}
