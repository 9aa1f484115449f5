//! Attestation request and receipt.

use serde::{Deserialize, Serialize};

/// A photo to attest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoAttestation {
    pub photo_id: String,
    pub ipfs_hash: String,
}

/// A recorded attestation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationReceipt {
    /// Registry-assigned id, `0x`-prefixed hex.
    pub attestation_id: String,
    pub tx_hash: String,
    /// Index key the attestation can be looked up by (the photo id).
    pub indexing_value: String,
}
