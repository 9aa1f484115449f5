//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Private key is not 32 bytes of valid hex or not a valid scalar
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Signature is not 65 bytes of r || s || v
    #[error("Invalid signature length: expected 65, got {0}")]
    InvalidSignatureLength(usize),

    /// Signature hex could not be decoded
    #[error("Invalid signature hex: {0}")]
    InvalidSignatureHex(String),

    /// Invalid signature format
    #[error("Invalid signature format")]
    InvalidSignatureFormat,

    /// v is not one of 0, 1, 27, 28
    #[error("Invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    /// Public key recovery failed
    #[error("Public key recovery failed")]
    RecoveryFailed,

    /// Signing failed
    #[error("Signing failed: {0}")]
    SigningFailed(String),
}
