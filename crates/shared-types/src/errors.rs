//! # Error Types
//!
//! Errors raised while parsing shared entities.

use thiserror::Error;

/// A label outside the closed tag enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown tag: {0}")]
pub struct UnknownTag(pub String);

/// Errors raised when parsing a hex address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Input is not valid hex.
    #[error("Invalid address hex: {0}")]
    InvalidHex(String),

    /// Decoded length is not 20 bytes.
    #[error("Invalid address length: expected 20 bytes, got {0}")]
    InvalidLength(usize),
}

/// Errors raised when parsing a persisted subscription record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Fewer than three comma-separated fields.
    #[error("Malformed subscription record: {0}")]
    Malformed(String),

    /// A required field is empty.
    #[error("Empty {field} in subscription record")]
    EmptyField { field: &'static str },

    /// The timestamp field is not an unsigned integer.
    #[error("Invalid consent timestamp: {0}")]
    InvalidTimestamp(String),

    /// The address contains the record delimiter and could not be replayed.
    #[error("Subscriber address must not contain ','")]
    DelimiterInAddress,
}
