//! Consent proof payload.
//!
//! Protobuf message carried by the messaging transport when a sender opens a
//! channel:
//!
//! ```text
//! message ConsentProofPayload {
//!   string signature = 1;
//!   uint64 timestamp = 2;
//!   ConsentProofPayloadVersion payload_version = 3;
//! }
//! ```

use super::errors::ConsentError;
use prost::Message;
use shared_types::RECORD_DELIMITER;

/// Payload versions known to the messaging network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ConsentProofPayloadVersion {
    Unspecified = 0,
    V1 = 1,
}

/// The only payload version currently defined.
pub const PAYLOAD_VERSION_V1: i32 = ConsentProofPayloadVersion::V1 as i32;

/// Wire form of the proof.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ConsentProofPayload {
    #[prost(string, tag = "1")]
    pub signature: String,
    #[prost(uint64, tag = "2")]
    pub timestamp: u64,
    #[prost(enumeration = "ConsentProofPayloadVersion", tag = "3")]
    pub payload_version: i32,
}

/// Decoded consent proof.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConsentProof {
    pub signature: String,
    pub timestamp_ms: u64,
    pub payload_version: i32,
}

impl ConsentProof {
    /// Version 1 proof.
    pub fn v1(signature: impl Into<String>, timestamp_ms: u64) -> Self {
        Self {
            signature: signature.into(),
            timestamp_ms,
            payload_version: PAYLOAD_VERSION_V1,
        }
    }

    /// Wire bytes.
    pub fn encode(&self) -> Vec<u8> {
        ConsentProofPayload::from(self.clone()).encode_to_vec()
    }

    /// Parse wire bytes. Unknown fields are skipped.
    pub fn decode(bytes: &[u8]) -> Result<Self, ConsentError> {
        let payload = ConsentProofPayload::decode(bytes)?;
        Ok(payload.into())
    }
}

impl From<ConsentProof> for ConsentProofPayload {
    fn from(proof: ConsentProof) -> Self {
        Self {
            signature: proof.signature,
            timestamp: proof.timestamp_ms,
            payload_version: proof.payload_version,
        }
    }
}

impl From<ConsentProofPayload> for ConsentProof {
    fn from(payload: ConsentProofPayload) -> Self {
        Self {
            signature: payload.signature,
            timestamp_ms: payload.timestamp,
            payload_version: payload.payload_version,
        }
    }
}

/// Check that a stored signature can be carried in a proof and replayed from
/// a subscription record.
///
/// Signatures are opaque strings, except that a `0x`-prefixed value is taken
/// to be hex and must be exactly 65 bytes.
pub fn validate_signature(signature: &str) -> Result<(), ConsentError> {
    if signature.is_empty() {
        return Err(ConsentError::EmptySignature);
    }
    if let Some(c) = signature
        .chars()
        .find(|c| c.is_control() || *c == RECORD_DELIMITER)
    {
        return Err(ConsentError::InvalidSignatureCharacter(c));
    }
    if let Some(hex_part) = signature.strip_prefix("0x") {
        let bytes =
            hex::decode(hex_part).map_err(|e| ConsentError::InvalidSignatureHex(e.to_string()))?;
        if bytes.len() != 65 {
            return Err(ConsentError::InvalidSignatureLength(bytes.len()));
        }
    }
    Ok(())
}

/// Encode the version 1 consent proof for a stored signature and timestamp.
pub fn build_consent_proof(signature: &str, timestamp_ms: u64) -> Result<Vec<u8>, ConsentError> {
    validate_signature(signature)?;
    Ok(ConsentProof::v1(signature, timestamp_ms).encode())
}

/// Decode consent proof bytes.
pub fn decode_consent_proof(bytes: &[u8]) -> Result<ConsentProof, ConsentError> {
    ConsentProof::decode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_encoding() {
        let proof = build_consent_proof("sig1", 1_700_000_000_000).unwrap();
        assert_eq!(hex::encode(proof), "0a04736967311080d095ffbc311801");
    }

    #[test]
    fn test_decode_known_encoding() {
        let bytes = hex::decode("0a04736967311080d095ffbc311801").unwrap();
        let proof = decode_consent_proof(&bytes).unwrap();
        assert_eq!(proof, ConsentProof::v1("sig1", 1_700_000_000_000));
    }

    #[test]
    fn test_zero_timestamp_omitted() {
        let proof = ConsentProof::v1("s", 0).encode();
        assert_eq!(proof, vec![0x0a, 0x01, b's', 0x18, 0x01]);
    }

    #[test]
    fn test_signature_validation() {
        assert_eq!(build_consent_proof("", 1), Err(ConsentError::EmptySignature));
        assert_eq!(
            build_consent_proof("a,b", 1),
            Err(ConsentError::InvalidSignatureCharacter(','))
        );
        assert_eq!(
            build_consent_proof("a\nb", 1),
            Err(ConsentError::InvalidSignatureCharacter('\n'))
        );
        assert!(matches!(
            build_consent_proof("0xzz", 1),
            Err(ConsentError::InvalidSignatureHex(_))
        ));
        assert_eq!(
            build_consent_proof("0x1234", 1),
            Err(ConsentError::InvalidSignatureLength(2))
        );

        let hex_sig = format!("0x{}", "ab".repeat(65));
        assert!(build_consent_proof(&hex_sig, 1).is_ok());
        assert!(build_consent_proof("sig1", 1).is_ok());
    }

    #[test]
    fn test_unknown_fields_skipped() {
        let mut bytes = hex::decode("0a0473696731").unwrap();
        // field 9 varint, field 10 length-delimited, field 11 fixed32
        bytes.extend([0x48, 0x96, 0x01, 0x52, 0x02, 0xaa, 0xbb, 0x5d, 1, 2, 3, 4]);
        let proof = decode_consent_proof(&bytes).unwrap();
        assert_eq!(proof.signature, "sig1");
        assert_eq!(proof.timestamp_ms, 0);
    }

    #[test]
    fn test_malformed_input() {
        for bytes in [
            // length past the end
            vec![0x0a, 0x05, b'a'],
            // timestamp sent length-delimited
            vec![0x12, 0x00],
            // field number zero
            vec![0x00],
            // unterminated varint
            vec![0x10, 0x80],
            // varint longer than 64 bits
            vec![0x10, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01],
            // signature not UTF-8
            vec![0x0a, 0x02, 0xc3, 0x28],
        ] {
            assert!(
                matches!(decode_consent_proof(&bytes), Err(ConsentError::Decode(_))),
                "accepted {}",
                hex::encode(&bytes)
            );
        }
    }

    #[test]
    fn test_payload_matches_proof() {
        let payload = ConsentProofPayload {
            signature: "sig1".to_string(),
            timestamp: 1_700_000_000_000,
            payload_version: ConsentProofPayloadVersion::V1 as i32,
        };
        assert_eq!(payload.encode_to_vec(), build_consent_proof("sig1", 1_700_000_000_000).unwrap());
        assert_eq!(payload.payload_version(), ConsentProofPayloadVersion::V1);
    }

    proptest! {
        #[test]
        fn prop_decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let _ = decode_consent_proof(&bytes);
        }

        #[test]
        fn prop_proof_preserves_pair(
            signature in "[a-zA-Z0-9]{1,40}",
            timestamp in any::<u64>(),
        ) {
            let bytes = build_consent_proof(&signature, timestamp).unwrap();
            let proof = decode_consent_proof(&bytes).unwrap();
            prop_assert_eq!(proof.signature, signature);
            prop_assert_eq!(proof.timestamp_ms, timestamp);
            prop_assert_eq!(proof.payload_version, PAYLOAD_VERSION_V1);
        }
    }
}
