//! # Subscription Records
//!
//! A record is persisted as the composite string
//! `"<address>,<signature>,<timestamp>"` in the set keyed `subscriptions:<tag>`.
//! The signature and timestamp are stored together and replayed together when
//! the consent proof is rebuilt; they are never regenerated.

use crate::errors::RecordError;
use crate::tag::Tag;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Field separator inside a persisted record.
pub const RECORD_DELIMITER: char = ',';

/// Store key for a tag's subscriber set.
pub fn subscription_key(tag: Tag) -> String {
    subscription_key_for_label(tag.label())
}

/// Store key for an arbitrary label.
pub fn subscription_key_for_label(label: &str) -> String {
    format!("subscriptions:{}", label)
}

/// Prefix that every record of `address` starts with.
pub fn address_prefix(address: &str) -> String {
    format!("{}{}", address, RECORD_DELIMITER)
}

/// One consented subscription of an address to a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub subscriber_address: String,
    pub consent_signature: String,
    /// Milliseconds since the Unix epoch.
    pub consent_timestamp: u64,
}

impl SubscriptionRecord {
    /// Create a record. Values are stored as given, without normalization.
    pub fn new(
        subscriber_address: impl Into<String>,
        consent_signature: impl Into<String>,
        consent_timestamp: u64,
    ) -> Result<Self, RecordError> {
        let subscriber_address = subscriber_address.into();
        let consent_signature = consent_signature.into();

        if subscriber_address.is_empty() {
            return Err(RecordError::EmptyField { field: "address" });
        }
        if consent_signature.is_empty() {
            return Err(RecordError::EmptyField { field: "signature" });
        }
        if subscriber_address.contains(RECORD_DELIMITER) {
            return Err(RecordError::DelimiterInAddress);
        }

        Ok(Self {
            subscriber_address,
            consent_signature,
            consent_timestamp,
        })
    }

    /// Composite string written to the store.
    pub fn encode(&self) -> String {
        format!(
            "{}{d}{}{d}{}",
            self.subscriber_address,
            self.consent_signature,
            self.consent_timestamp,
            d = RECORD_DELIMITER
        )
    }

    /// Parse a stored member.
    ///
    /// The address is everything before the first delimiter and the timestamp
    /// everything after the last one; the signature is what lies between.
    pub fn parse(raw: &str) -> Result<Self, RecordError> {
        let (address, rest) = raw
            .split_once(RECORD_DELIMITER)
            .ok_or_else(|| RecordError::Malformed(raw.to_string()))?;
        let (signature, timestamp) = rest
            .rsplit_once(RECORD_DELIMITER)
            .ok_or_else(|| RecordError::Malformed(raw.to_string()))?;

        if address.is_empty() {
            return Err(RecordError::EmptyField { field: "address" });
        }
        if signature.is_empty() {
            return Err(RecordError::EmptyField { field: "signature" });
        }

        let consent_timestamp = timestamp
            .trim()
            .parse::<u64>()
            .map_err(|_| RecordError::InvalidTimestamp(timestamp.to_string()))?;

        Ok(Self {
            subscriber_address: address.to_string(),
            consent_signature: signature.to_string(),
            consent_timestamp,
        })
    }

    /// Address field of a stored member, without parsing the rest.
    pub fn address_of(raw: &str) -> &str {
        raw.split(RECORD_DELIMITER).next().unwrap_or(raw)
    }

    /// Whether a stored member belongs to `address`.
    pub fn belongs_to(raw: &str, address: &str) -> bool {
        raw.len() > address.len()
            && raw.starts_with(address)
            && raw[address.len()..].starts_with(RECORD_DELIMITER)
    }
}

impl fmt::Display for SubscriptionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
