//! # EIP-191 Personal Messages
//!
//! `keccak256("\x19Ethereum Signed Message:\n" || len(message) || message)`,
//! the hash wallets sign for `personal_sign`.

use crate::ecdsa::{recover_address, RecoverableSignature};
use crate::errors::CryptoError;
use shared_types::{keccak256, Address, Hash};

const PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Hash a message the way `personal_sign` does.
pub fn hash_message(message: &[u8]) -> Hash {
    let mut buf = Vec::with_capacity(PREFIX.len() + 20 + message.len());
    buf.extend_from_slice(PREFIX.as_bytes());
    buf.extend_from_slice(message.len().to_string().as_bytes());
    buf.extend_from_slice(message);
    keccak256(&buf)
}

/// Recover the address that signed `message` with `personal_sign`.
pub fn recover_message_signer(
    message: &[u8],
    signature: &RecoverableSignature,
) -> Result<Address, CryptoError> {
    recover_address(&hash_message(message), signature)
}
