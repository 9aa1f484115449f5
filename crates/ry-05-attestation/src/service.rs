//! Attestation relay.

use crate::domain::attestation::{AttestationReceipt, PhotoAttestation};
use crate::domain::errors::AttestationError;
use crate::ports::outbound::Attestor;
use std::sync::Arc;
use tracing::info;

/// Validates requests and records them with the registry.
pub struct AttestationRelay {
    attestor: Arc<dyn Attestor>,
}

impl AttestationRelay {
    pub fn new(attestor: Arc<dyn Attestor>) -> Self {
        Self { attestor }
    }

    /// Attest that the photo `photo_id` with content `ipfs_hash` is verified.
    pub async fn create_attestation(
        &self,
        photo_id: &str,
        ipfs_hash: &str,
    ) -> Result<AttestationReceipt, AttestationError> {
        if photo_id.is_empty() {
            return Err(AttestationError::MissingField("photoId"));
        }
        if ipfs_hash.is_empty() {
            return Err(AttestationError::MissingField("ipfsHash"));
        }

        info!(photo_id, ipfs_hash, "Creating attestation");
        self.attestor
            .attest(&PhotoAttestation {
                photo_id: photo_id.to_string(),
                ipfs_hash: ipfs_hash.to_string(),
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoAttestor;

    #[async_trait]
    impl Attestor for EchoAttestor {
        async fn attest(
            &self,
            photo: &PhotoAttestation,
        ) -> Result<AttestationReceipt, AttestationError> {
            Ok(AttestationReceipt {
                attestation_id: "0x1".to_string(),
                tx_hash: format!("0x{}", photo.ipfs_hash),
                indexing_value: photo.photo_id.clone(),
            })
        }
    }

    #[tokio::test]
    async fn test_required_fields() {
        let relay = AttestationRelay::new(Arc::new(EchoAttestor));
        assert_eq!(
            relay.create_attestation("", "Qm").await,
            Err(AttestationError::MissingField("photoId"))
        );
        assert_eq!(
            relay.create_attestation("p", "").await,
            Err(AttestationError::MissingField("ipfsHash"))
        );
    }

    #[tokio::test]
    async fn test_indexed_by_photo_id() {
        let relay = AttestationRelay::new(Arc::new(EchoAttestor));
        let receipt = relay.create_attestation("photo-9", "QmX").await.unwrap();
        assert_eq!(receipt.indexing_value, "photo-9");
    }
}
