//! Attestation domain.

pub mod attestation;
pub mod errors;
pub mod schema;
