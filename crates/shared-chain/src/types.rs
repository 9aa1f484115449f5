//! JSON-RPC wire types.

use crate::errors::ChainError;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Hash};
use std::time::Duration;

/// `eth_call` / `eth_estimateGas` argument.
#[derive(Debug, Clone, Serialize)]
pub struct CallRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub to: String,
    pub data: String,
}

impl CallRequest {
    pub fn new(to: Address, data: &[u8]) -> Self {
        Self {
            from: None,
            to: to.to_checksum(),
            data: format!("0x{}", hex::encode(data)),
        }
    }

    pub fn from(mut self, from: Address) -> Self {
        self.from = Some(from.to_checksum());
        self
    }
}

/// Event log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    pub address: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub data: String,
}

impl Log {
    /// Whether this log was emitted by `address` with `topic0` as its first topic.
    pub fn matches(&self, address: &Address, topic0: &Hash) -> bool {
        address.matches(&self.address)
            && self
                .topics
                .first()
                .map(|t| t.eq_ignore_ascii_case(&format!("0x{}", hex::encode(topic0))))
                .unwrap_or(false)
    }

    /// Decoded data bytes.
    pub fn data_bytes(&self) -> Result<Vec<u8>, ChainError> {
        decode_hex(&self.data)
    }

    /// Indexed topic `index` as an integer.
    pub fn topic_uint(&self, index: usize) -> Result<U256, ChainError> {
        let topic = self
            .topics
            .get(index)
            .ok_or_else(|| ChainError::InvalidResponse(format!("log has no topic {}", index)))?;
        parse_quantity(topic)
    }
}

/// Mined transaction receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: String,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub logs: Vec<Log>,
}

impl TransactionReceipt {
    /// Pre-Byzantium receipts carry no status and count as success.
    pub fn succeeded(&self) -> bool {
        !matches!(self.status.as_deref(), Some("0x0") | Some("0x00"))
    }

    /// First log matching `address` and `topic0`.
    pub fn find_log(&self, address: &Address, topic0: &Hash) -> Option<&Log> {
        self.logs.iter().find(|log| log.matches(address, topic0))
    }
}

/// Receipt polling budget.
#[derive(Debug, Clone)]
pub struct ReceiptPolling {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for ReceiptPolling {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 60,
        }
    }
}

/// Parse a hex quantity such as `0x1a`.
pub fn parse_quantity(s: &str) -> Result<U256, ChainError> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    if stripped.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_str_radix(stripped, 16)
        .map_err(|_| ChainError::InvalidResponse(format!("invalid quantity: {}", s)))
}

/// Decode `0x`-prefixed hex data.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, ChainError> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(stripped).map_err(|e| ChainError::InvalidResponse(format!("invalid hex: {}", e)))
}
