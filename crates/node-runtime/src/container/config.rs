//! # Node Configuration
//!
//! Unified configuration for all subsystems, read from `RY_*` environment
//! variables.
//!
//! ## Security Requirements
//!
//! - `RY_SENDER_KEY_DEFAULT` MUST be set; every notification is signed by a
//!   sender identity
//! - Private keys never appear in `Debug` output

use ry_03_notification_dispatch::DispatchConfig;
use ry_04_image_analysis::{
    PollingConfig, DEFAULT_IPFS_GATEWAY, DEFAULT_ORACLE_ADDRESS, DEFAULT_ORACLE_RPC_URL,
};
use ry_05_attestation::{DEFAULT_ATTESTATION_CONTRACT, DEFAULT_ATTESTATION_RPC_URL};
use ry_06_api_gateway::GatewayConfig;
use shared_types::Tag;
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// HTTP gateway configuration.
    pub gateway: GatewayConfig,
    /// Subscription store configuration.
    pub storage: StorageConfig,
    /// Sender identities.
    pub senders: SenderConfig,
    /// Messaging relay and dispatch policy.
    pub messaging: MessagingConfig,
    /// Inference oracle configuration.
    pub oracle: OracleConfig,
    /// Attestation registry configuration.
    pub attestation: AttestationConfig,
    /// Verify consent signatures on `/subscribe`.
    pub verify_consent: bool,
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable could not be parsed.
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: String, value: String },

    /// Two settings only make sense together.
    #[error("{0} requires {1}")]
    Requires(&'static str, &'static str),

    /// Gateway settings are out of range.
    #[error("Invalid gateway configuration: {0}")]
    Gateway(String),
}

/// Subscription store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    RocksDb,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rocksdb" => Ok(StoreBackend::RocksDb),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(()),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StoreBackend,
    /// RocksDB directory.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::RocksDb,
            data_dir: PathBuf::from("./data/subscriptions"),
        }
    }
}

/// Hex private key. Redacted in `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(***)")
    }
}

/// Sender identities: a default key and optional per-tag keys.
#[derive(Debug, Clone, Default)]
pub struct SenderConfig {
    pub default_key: Option<SecretKey>,
    pub tag_keys: BTreeMap<Tag, SecretKey>,
}

/// Messaging relay configuration.
#[derive(Debug, Clone, Default)]
pub struct MessagingConfig {
    /// Relay base URL. Notifications are disabled without it.
    pub relay_url: Option<String>,
    pub relay_token: Option<SecretKey>,
    pub dispatch: DispatchConfig,
}

/// Inference oracle configuration.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub rpc_url: String,
    pub contract: String,
    /// Backend key paying for oracle calls. Analysis is disabled without it.
    pub private_key: Option<SecretKey>,
    pub ipfs_gateway: String,
    pub polling: PollingConfig,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_ORACLE_RPC_URL.to_string(),
            contract: DEFAULT_ORACLE_ADDRESS.to_string(),
            private_key: None,
            ipfs_gateway: DEFAULT_IPFS_GATEWAY.to_string(),
            polling: PollingConfig::default(),
        }
    }
}

/// Attestation registry configuration.
#[derive(Debug, Clone)]
pub struct AttestationConfig {
    pub rpc_url: String,
    pub contract: String,
    /// Attestations are disabled without a key and a schema id.
    pub private_key: Option<SecretKey>,
    pub schema_id: Option<String>,
}

impl Default for AttestationConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_ATTESTATION_RPC_URL.to_string(),
            contract: DEFAULT_ATTESTATION_CONTRACT.to_string(),
            private_key: None,
            schema_id: None,
        }
    }
}

impl NodeConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source. Empty values
    /// count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = NodeConfig::default();

        // Gateway
        if let Some(host) = get("RY_HTTP_HOST") {
            config.gateway.http.host = parse("RY_HTTP_HOST", &host)?;
        }
        if let Some(port) = get("RY_HTTP_PORT") {
            config.gateway.http.port = parse("RY_HTTP_PORT", &port)?;
        }
        if let Some(rps) = get("RY_RATE_LIMIT_RPS") {
            config.gateway.rate_limit.requests_per_second = parse("RY_RATE_LIMIT_RPS", &rps)?;
        }
        if let Some(burst) = get("RY_RATE_LIMIT_BURST") {
            config.gateway.rate_limit.burst_size = parse("RY_RATE_LIMIT_BURST", &burst)?;
        }
        if let Some(ms) = get("RY_REQUEST_TIMEOUT_MS") {
            config.gateway.timeouts.request = millis("RY_REQUEST_TIMEOUT_MS", &ms)?;
        }
        if let Some(name) = get("RY_SERVICE_NAME") {
            config.gateway.service_name = name;
        }

        // Storage
        if let Some(backend) = get("RY_STORE_BACKEND") {
            config.storage.backend = parse("RY_STORE_BACKEND", &backend)?;
        }
        if let Some(dir) = get("RY_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(dir);
        }

        // Senders
        config.senders.default_key = get("RY_SENDER_KEY_DEFAULT").map(SecretKey::new);
        for tag in Tag::ALL {
            if let Some(key) = get(&format!("RY_SENDER_KEY_{}", tag.env_suffix())) {
                config.senders.tag_keys.insert(tag, SecretKey::new(key));
            }
        }

        // Messaging
        config.messaging.relay_url = get("RY_RELAY_URL");
        config.messaging.relay_token = get("RY_RELAY_TOKEN").map(SecretKey::new);
        if let Some(ms) = get("RY_PACING_MS") {
            config.messaging.dispatch.pacing = millis("RY_PACING_MS", &ms)?;
        }
        if let Some(ms) = get("RY_TRANSPORT_TIMEOUT_MS") {
            config.messaging.dispatch.transport_timeout = millis("RY_TRANSPORT_TIMEOUT_MS", &ms)?;
        }
        if let Some(flag) = get("RY_VERIFY_CONSENT") {
            config.verify_consent = flag_value("RY_VERIFY_CONSENT", &flag)?;
        }

        // Oracle
        if let Some(url) = get("RY_ORACLE_RPC_URL") {
            config.oracle.rpc_url = url;
        }
        if let Some(address) = get("RY_ORACLE_ADDRESS") {
            config.oracle.contract = address;
        }
        config.oracle.private_key = get("RY_BACKEND_PRIVATE_KEY").map(SecretKey::new);
        if let Some(gateway) = get("RY_IPFS_GATEWAY") {
            config.oracle.ipfs_gateway = gateway;
        }
        if let Some(ms) = get("RY_ORACLE_INITIAL_DELAY_MS") {
            config.oracle.polling.initial_delay = millis("RY_ORACLE_INITIAL_DELAY_MS", &ms)?;
        }
        if let Some(attempts) = get("RY_ORACLE_MAX_ATTEMPTS") {
            config.oracle.polling.max_attempts = parse("RY_ORACLE_MAX_ATTEMPTS", &attempts)?;
        }
        if let Some(ms) = get("RY_ORACLE_MAX_DELAY_MS") {
            config.oracle.polling.max_delay = millis("RY_ORACLE_MAX_DELAY_MS", &ms)?;
        }

        // Attestation
        if let Some(url) = get("RY_ATTESTATION_RPC_URL") {
            config.attestation.rpc_url = url;
        }
        if let Some(contract) = get("RY_ATTESTATION_CONTRACT") {
            config.attestation.contract = contract;
        }
        config.attestation.private_key = get("RY_ATTESTATION_PRIVATE_KEY").map(SecretKey::new);
        config.attestation.schema_id = get("RY_SCHEMA_ID");

        Ok(config)
    }

    /// Check the configuration can start a node.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.senders.default_key.is_none() {
            return Err(ConfigError::Missing("RY_SENDER_KEY_DEFAULT"));
        }

        if self.storage.backend == StoreBackend::RocksDb
            && self.storage.data_dir.as_os_str().is_empty()
        {
            return Err(ConfigError::Missing("RY_DATA_DIR"));
        }

        if self.messaging.relay_token.is_some() && self.messaging.relay_url.is_none() {
            return Err(ConfigError::Requires("RY_RELAY_TOKEN", "RY_RELAY_URL"));
        }

        if self.oracle.polling.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                var: "RY_ORACLE_MAX_ATTEMPTS".to_string(),
                value: "0".to_string(),
            });
        }

        match (&self.attestation.private_key, &self.attestation.schema_id) {
            (Some(_), None) => {
                return Err(ConfigError::Requires("RY_ATTESTATION_PRIVATE_KEY", "RY_SCHEMA_ID"))
            }
            (None, Some(_)) => {
                return Err(ConfigError::Requires("RY_SCHEMA_ID", "RY_ATTESTATION_PRIVATE_KEY"))
            }
            _ => {}
        }

        self.gateway
            .validate()
            .map_err(|e| ConfigError::Gateway(e.to_string()))
    }

    pub fn notifications_enabled(&self) -> bool {
        self.messaging.relay_url.is_some()
    }

    pub fn analysis_enabled(&self) -> bool {
        self.oracle.private_key.is_some()
    }

    pub fn attestation_enabled(&self) -> bool {
        self.attestation.private_key.is_some() && self.attestation.schema_id.is_some()
    }
}

fn parse<T: FromStr>(var: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid {
        var: var.to_string(),
        value: value.to_string(),
    })
}

fn millis(var: &str, value: &str) -> Result<Duration, ConfigError> {
    parse::<u64>(var, value).map(Duration::from_millis)
}

fn flag_value(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var: var.to_string(),
            value: value.to_string(),
        }),
    }
}
