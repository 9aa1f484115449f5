//! # Photo Schema
//!
//! Attestation data follows the registered schema
//! `(string PhotoHash, string PhotoId, bool IsVerified)` and is stored
//! ABI-encoded on-chain.

use super::attestation::PhotoAttestation;
use super::errors::AttestationError;
use shared_chain::{encode, Token, U256};
use shared_types::Address;

/// Sign Protocol `attest` entry point.
pub const ATTEST_SIGNATURE: &str = "attest((uint64,uint64,uint64,uint64,address,uint64,uint8,bool,bytes[],bytes),string,bytes,bytes)";
/// Event carrying the new attestation id.
pub const ATTESTATION_MADE: &str = "AttestationMade(uint64,string)";

/// Data stored on-chain, no off-chain locations.
const DATA_LOCATION_ONCHAIN: u64 = 0;

/// Parse a schema id given as `0x` hex, decimal, or
/// `onchain_evm_<chainId>_0x<hex>`.
pub fn parse_schema_id(raw: &str) -> Result<u64, AttestationError> {
    let invalid = || AttestationError::InvalidSchemaId(raw.to_string());
    let trimmed = raw.trim();

    let id = match trimmed.strip_prefix("onchain_evm_") {
        Some(rest) => rest.rsplit_once('_').map(|(_, id)| id).ok_or_else(invalid)?,
        None => trimmed,
    };

    match id.strip_prefix("0x").or_else(|| id.strip_prefix("0X")) {
        Some(hex) if !hex.is_empty() => u64::from_str_radix(hex, 16).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
        None => id.parse::<u64>().map_err(|_| invalid()),
    }
}

/// ABI-encoded schema data for `photo`.
pub fn encode_schema_data(photo: &PhotoAttestation) -> Vec<u8> {
    encode(&[
        Token::String(photo.ipfs_hash.clone()),
        Token::String(photo.photo_id.clone()),
        Token::Bool(true),
    ])
}

/// Arguments of `attest` for `photo`, indexed by its photo id.
pub fn attest_arguments(schema_id: u64, attester: Address, photo: &PhotoAttestation) -> Vec<Token> {
    let zero = || Token::Uint(U256::zero());
    let attestation = Token::Tuple(vec![
        Token::Uint(U256::from(schema_id)),
        zero(), // linkedAttestationId
        zero(), // attestTimestamp, set by the registry
        zero(), // revokeTimestamp
        Token::Address(attester),
        zero(), // validUntil
        Token::Uint(U256::from(DATA_LOCATION_ONCHAIN)),
        Token::Bool(false),
        Token::Array(Vec::new()),
        Token::Bytes(encode_schema_data(photo)),
    ]);

    vec![
        attestation,
        Token::String(photo.photo_id.clone()),
        Token::Bytes(Vec::new()),
        Token::Bytes(Vec::new()),
    ]
}
