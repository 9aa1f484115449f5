//! # Shared Crypto
//!
//! secp256k1 primitives used by the Real You services.
//!
//! ## Modules
//!
//! - `ecdsa`: recoverable signatures and address recovery
//! - `eip191`: personal-message hashing, signing and signer recovery
//! - `wallet`: private-key identities used as message senders and transaction signers

pub mod ecdsa;
pub mod eip191;
pub mod errors;
pub mod wallet;

pub use ecdsa::{address_from_pubkey, recover_address, RecoverableSignature};
pub use eip191::{hash_message, recover_message_signer};
pub use errors::CryptoError;
pub use wallet::Wallet;
