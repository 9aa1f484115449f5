//! # Wallets
//!
//! A private key together with its derived address. Used as the sender
//! identity for tag notifications and as the signer of oracle and
//! attestation transactions.

use crate::ecdsa::{address_from_pubkey, RecoverableSignature};
use crate::eip191::hash_message;
use crate::errors::CryptoError;
use k256::ecdsa::SigningKey;
use shared_types::{Address, Hash};
use std::fmt;

/// secp256k1 identity.
#[derive(Clone)]
pub struct Wallet {
    signing_key: SigningKey,
    address: Address,
}

impl Wallet {
    /// Build from a 32-byte private key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let signing_key = SigningKey::from_slice(bytes).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self::from_signing_key(signing_key))
    }

    /// Build from a hex private key, with or without `0x`.
    pub fn from_hex_key(key: &str) -> Result<Self, CryptoError> {
        let trimmed = key.trim();
        let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(stripped).map_err(|_| CryptoError::InvalidPrivateKey)?;
        if bytes.len() != 32 {
            return Err(CryptoError::InvalidPrivateKey);
        }
        Self::from_bytes(&bytes)
    }

    /// Fresh random identity.
    pub fn random() -> Self {
        Self::from_signing_key(SigningKey::random(&mut rand::thread_rng()))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let address = address_from_pubkey(signing_key.verifying_key());
        Self {
            signing_key,
            address,
        }
    }

    /// Account address of this identity.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a 32-byte prehash. The signature is low-S normalized.
    pub fn sign_prehash(&self, hash: &Hash) -> Result<RecoverableSignature, CryptoError> {
        let (sig, recid) = self
            .signing_key
            .sign_prehash_recoverable(hash)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;

        let sig_bytes = sig.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&sig_bytes[..32]);
        s.copy_from_slice(&sig_bytes[32..]);

        Ok(RecoverableSignature {
            r,
            s,
            v: recid.to_byte() + 27,
        })
    }

    /// `personal_sign` over an arbitrary message.
    pub fn sign_message(&self, message: &[u8]) -> Result<RecoverableSignature, CryptoError> {
        self.sign_prehash(&hash_message(message))
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
