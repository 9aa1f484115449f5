//! # Outbound Ports

use crate::domain::attestation::{AttestationReceipt, PhotoAttestation};
use crate::domain::errors::AttestationError;
use async_trait::async_trait;

/// Attestation registry.
#[async_trait]
pub trait Attestor: Send + Sync {
    /// Record `photo` as verified.
    async fn attest(&self, photo: &PhotoAttestation) -> Result<AttestationReceipt, AttestationError>;
}
