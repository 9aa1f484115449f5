//! # RY-05 Attestation
//!
//! Records on-chain that a photo was verified. The attestation carries the
//! photo's content hash and id under a registered schema and is indexed by
//! the photo id, so anyone can look it up later.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::sign_protocol::{
    SignProtocolAttestor, DEFAULT_ATTESTATION_CONTRACT, DEFAULT_ATTESTATION_RPC_URL,
};
pub use domain::attestation::{AttestationReceipt, PhotoAttestation};
pub use domain::errors::AttestationError;
pub use domain::schema::{encode_schema_data, parse_schema_id};
pub use ports::outbound::Attestor;
pub use service::AttestationRelay;
