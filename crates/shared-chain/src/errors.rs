//! Chain client error types.

use shared_crypto::CryptoError;
use thiserror::Error;

/// ABI encoding and decoding errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// Data ended before the value it should contain.
    #[error("ABI data truncated at offset {0}")]
    Truncated(usize),

    /// An offset or length does not fit in memory.
    #[error("ABI offset or length out of range at {0}")]
    InvalidOffset(usize),

    /// A string value is not UTF-8.
    #[error("ABI string is not valid UTF-8")]
    InvalidUtf8,

    /// A bool word is neither 0 nor 1.
    #[error("ABI bool has invalid value")]
    InvalidBool,

    /// Decoded tokens do not have the expected shape.
    #[error("Unexpected ABI token: expected {0}")]
    UnexpectedToken(&'static str),
}

/// Errors talking to a node.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Transport level failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection refused or unreachable after retries.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The node returned a JSON-RPC error object.
    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The response did not have the expected shape.
    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),

    /// Receipt did not appear within the polling budget.
    #[error("Receipt for {tx_hash} not found after {attempts} attempts")]
    ReceiptTimeout { tx_hash: String, attempts: u32 },

    /// Transaction was mined with status 0.
    #[error("Transaction {tx_hash} reverted")]
    TransactionReverted { tx_hash: String },

    /// ABI codec failure.
    #[error("ABI error: {0}")]
    Abi(#[from] AbiError),

    /// Signing failure.
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),
}
