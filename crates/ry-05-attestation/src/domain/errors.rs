//! # Attestation Errors

use shared_chain::ChainError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttestationError {
    /// A required request field is empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Schema id is not hex, decimal or a full `onchain_evm_` id.
    #[error("Invalid schema id: {0}")]
    InvalidSchemaId(String),

    /// Transaction failed or the node could not be reached.
    #[error("Attestation transaction failed: {0}")]
    Chain(String),

    /// Transaction succeeded but emitted no `AttestationMade` event.
    #[error("No AttestationMade event in transaction {tx_hash}")]
    MissingEvent { tx_hash: String },
}

impl From<ChainError> for AttestationError {
    fn from(err: ChainError) -> Self {
        AttestationError::Chain(err.to_string())
    }
}
