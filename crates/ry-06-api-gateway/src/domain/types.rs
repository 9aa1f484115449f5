//! Request and response bodies.
//!
//! Request fields are all optional so a missing field is reported with the
//! endpoint's own 400 text rather than a deserializer error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::Tag;

/// `POST /subscribe`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubscribeRequest {
    pub tag: Option<String>,
    pub address: Option<String>,
    pub signature: Option<String>,
    /// Milliseconds since the epoch, as a JSON number or numeric string.
    pub current_time: Option<Value>,
}

/// `POST /notify`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NotifyRequest {
    pub tag: Option<String>,
}

/// `POST /gpt4vision`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzeRequest {
    pub ipfs_url: Option<String>,
}

/// `POST /createAttestation`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttestationRequest {
    pub photo_id: Option<String>,
    pub ipfs_hash: Option<String>,
}

/// `GET /userSubscriptions`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddressQuery {
    pub address: Option<String>,
}

/// `GET /getSubscriptions`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TagQuery {
    pub tag: Option<String>,
}

/// `GET /consentMessage`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConsentMessageQuery {
    pub tag: Option<String>,
    /// Defaults to the current time.
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionsResponse {
    pub subscriptions: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressesResponse {
    pub addresses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationResponse {
    pub message: String,
    pub attestation_id: String,
    pub tx_hash: String,
    pub indexing_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentMessageResponse {
    pub sender_address: String,
    pub timestamp: u64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Non-empty string field, or `None`.
pub fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

/// Read a millisecond timestamp from a JSON number or numeric string.
pub fn parse_timestamp(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Whether a JSON field was supplied with a truthy value.
///
/// `null`, `false`, `0` and `""` count as missing.
pub fn is_present(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}
