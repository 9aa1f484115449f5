//! # RY-01 Consent Codec
//!
//! Builds the two artifacts that tie a subscriber's consent to a sender:
//!
//! - the **consent message**, the exact text a subscriber signs to grant a
//!   tag's sender permission to message their inbox, and
//! - the **consent proof**, the binary payload the messaging transport
//!   receives when the sender opens a channel, carrying the subscriber's
//!   signature and the timestamp that was signed.
//!
//! Both are pure functions. Identical inputs always produce byte-identical
//! output, which is what lets a stored `(signature, timestamp)` pair be
//! replayed long after the subscription was made.
//!
//! ## Usage
//!
//! ```
//! use ry_01_consent_codec::{build_consent_message, build_consent_proof};
//!
//! let message = build_consent_message("0xSender", 1_700_000_000_000).unwrap();
//! assert!(message.contains("Current Time: Tue, 14 Nov 2023 22:13:20 GMT"));
//!
//! let proof = build_consent_proof("sig1", 1_700_000_000_000).unwrap();
//! assert_eq!(proof[0], 0x0a);
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;

pub use domain::errors::ConsentError;
pub use domain::message::{build_consent_message, format_utc_timestamp, MAX_TIMESTAMP_MS};
pub use domain::proof::{
    build_consent_proof, decode_consent_proof, validate_signature, ConsentProof,
    ConsentProofPayload, ConsentProofPayloadVersion, PAYLOAD_VERSION_V1,
};
pub use domain::verify::verify_consent;
