//! # Consent Errors

use shared_crypto::CryptoError;
use thiserror::Error;

/// Errors raised while building, decoding or verifying consent artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsentError {
    /// Timestamp cannot be rendered as a calendar date.
    #[error("Consent timestamp out of range: {0}")]
    TimestampOutOfRange(u64),

    /// Signature is empty.
    #[error("Consent signature is empty")]
    EmptySignature,

    /// Signature contains a control character or the record delimiter.
    #[error("Consent signature contains invalid character {0:?}")]
    InvalidSignatureCharacter(char),

    /// `0x`-prefixed signature is not valid hex.
    #[error("Consent signature is not valid hex: {0}")]
    InvalidSignatureHex(String),

    /// `0x`-prefixed signature is not 65 bytes.
    #[error("Consent signature must be 65 bytes, got {0}")]
    InvalidSignatureLength(usize),

    /// Proof bytes are not a valid protobuf payload.
    #[error("Malformed consent proof: {0}")]
    Decode(String),

    /// Address could not be parsed for verification.
    #[error("Invalid address for consent verification: {0}")]
    InvalidAddress(String),

    /// Signature could not be used for recovery.
    #[error("Consent signature cannot be verified: {0}")]
    Crypto(#[from] CryptoError),

    /// Signature was produced by another address.
    #[error("Consent signed by {actual}, expected {expected}")]
    SignerMismatch { expected: String, actual: String },
}

impl From<prost::DecodeError> for ConsentError {
    fn from(err: prost::DecodeError) -> Self {
        ConsentError::Decode(err.to_string())
    }
}
