//! # Subsystem Container
//!
//! Holds all subsystem instances and wires them from configuration.
//!
//! ## Initialization Order
//!
//! ```text
//! Level 0: Subscription Store, Sender Registry (always present)
//! Level 1: Notification Dispatch (store + senders + relay)
//! Level 2: Image Analysis, Attestation (own chain clients, optional)
//! Level 3: API Gateway context (everything above)
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use ry_02_subscription_store::{
    InMemorySetStore, RocksDbConfig, RocksDbSetStore, SetStore, SubscriptionStore,
};
use ry_03_notification_dispatch::{
    HttpRelayTransport, NotificationDispatcher, RelayConfig, TagSenderRegistry,
};
use ry_04_image_analysis::{AnalysisConfig, GaladrielOracle, ImageAnalysisRelay};
use ry_05_attestation::{parse_schema_id, AttestationRelay, SignProtocolAttestor};
use ry_06_api_gateway::GatewayContext;
use shared_chain::{JsonRpcClient, ReceiptPolling, RpcConfig, TransactionSender};
use shared_crypto::Wallet;
use shared_types::Address;

use crate::container::config::{NodeConfig, SecretKey, StoreBackend};

/// Central container holding all subsystem instances.
pub struct SubsystemContainer {
    /// Subscription Store (ry-02)
    pub store: SubscriptionStore,

    /// Sender identity per tag
    pub senders: Arc<TagSenderRegistry>,

    /// Notification Dispatch (ry-03), present when a relay is configured
    pub dispatcher: Option<Arc<NotificationDispatcher>>,

    /// Image Analysis (ry-04), present when a backend key is configured
    pub analysis: Option<Arc<ImageAnalysisRelay>>,

    /// Attestation (ry-05), present when a key and schema are configured
    pub attestation: Option<Arc<AttestationRelay>>,

    /// Node configuration (immutable after initialization).
    pub config: NodeConfig,
}

impl SubsystemContainer {
    /// Create a container with every configured subsystem initialized.
    #[instrument(name = "subsystem_init", skip(config))]
    pub fn new(config: NodeConfig) -> Result<Self> {
        config.validate().context("Invalid node configuration")?;
        info!("Initializing Real You subsystem container");

        // Level 0
        let store = open_store(&config)?;
        let senders = Arc::new(build_senders(&config)?);
        info!(
            default_sender = %senders.default_sender().address(),
            tag_senders = config.senders.tag_keys.len(),
            "  [02] Subscription store and sender registry ready"
        );

        // Level 1
        let dispatcher = match &config.messaging.relay_url {
            Some(url) => {
                let mut relay = RelayConfig::new(url.clone());
                if let Some(token) = &config.messaging.relay_token {
                    relay = relay.with_token(token.expose());
                }
                let transport =
                    HttpRelayTransport::new(relay).context("Failed to create relay transport")?;
                info!(relay = %url, "  [03] Notification dispatch initialized");
                Some(Arc::new(NotificationDispatcher::new(
                    Arc::new(store.clone()),
                    Arc::new(transport),
                    Arc::clone(&senders),
                    config.messaging.dispatch.clone(),
                )))
            }
            None => {
                warn!("  [03] RY_RELAY_URL not set, notifications disabled");
                None
            }
        };

        // Level 2
        let analysis = match &config.oracle.private_key {
            Some(key) => {
                let sender = transaction_sender(&config.oracle.rpc_url, key, "RY_BACKEND_PRIVATE_KEY")?;
                let contract = parse_address(&config.oracle.contract, "RY_ORACLE_ADDRESS")?;
                let oracle = GaladrielOracle::new(sender, contract);
                info!(contract = %contract, "  [04] Image analysis initialized");
                Some(Arc::new(ImageAnalysisRelay::new(
                    Arc::new(oracle),
                    AnalysisConfig {
                        ipfs_gateway: config.oracle.ipfs_gateway.clone(),
                        polling: config.oracle.polling.clone(),
                    },
                )))
            }
            None => {
                warn!("  [04] RY_BACKEND_PRIVATE_KEY not set, image analysis disabled");
                None
            }
        };

        let attestation = match (&config.attestation.private_key, &config.attestation.schema_id) {
            (Some(key), Some(schema)) => {
                let schema_id = parse_schema_id(schema).context("Invalid RY_SCHEMA_ID")?;
                let sender = transaction_sender(
                    &config.attestation.rpc_url,
                    key,
                    "RY_ATTESTATION_PRIVATE_KEY",
                )?;
                let contract =
                    parse_address(&config.attestation.contract, "RY_ATTESTATION_CONTRACT")?;
                let attestor = SignProtocolAttestor::new(sender, contract, schema_id);
                info!(contract = %contract, schema_id, "  [05] Attestation initialized");
                Some(Arc::new(AttestationRelay::new(Arc::new(attestor))))
            }
            _ => {
                warn!("  [05] Attestation key or schema not set, attestations disabled");
                None
            }
        };

        Ok(Self {
            store,
            senders,
            dispatcher,
            analysis,
            attestation,
            config,
        })
    }

    /// Handler state for the API gateway (ry-06).
    pub fn gateway_context(&self) -> GatewayContext {
        let mut context = GatewayContext::new(self.store.clone(), Arc::clone(&self.senders))
            .with_consent_verification(self.config.verify_consent);
        if let Some(dispatcher) = &self.dispatcher {
            context = context.with_dispatcher(Arc::clone(dispatcher));
        }
        if let Some(analysis) = &self.analysis {
            context = context.with_analysis(Arc::clone(analysis));
        }
        if let Some(attestation) = &self.attestation {
            context = context.with_attestation(Arc::clone(attestation));
        }
        context
    }
}

fn open_store(config: &NodeConfig) -> Result<SubscriptionStore> {
    let backend: Arc<dyn SetStore> = match config.storage.backend {
        StoreBackend::RocksDb => {
            let path = config.storage.data_dir.to_string_lossy().to_string();
            let db = RocksDbSetStore::open(RocksDbConfig {
                path: path.clone(),
                ..RocksDbConfig::default()
            })
            .with_context(|| format!("Failed to open subscription store at {}", path))?;
            Arc::new(db)
        }
        StoreBackend::Memory => {
            warn!("Using in-memory subscription store, subscriptions are lost on restart");
            Arc::new(InMemorySetStore::new())
        }
    };
    Ok(SubscriptionStore::new(backend))
}

fn build_senders(config: &NodeConfig) -> Result<TagSenderRegistry> {
    let default_key = config
        .senders
        .default_key
        .as_ref()
        .context("RY_SENDER_KEY_DEFAULT must be set")?;
    let mut registry = TagSenderRegistry::new(wallet(default_key, "RY_SENDER_KEY_DEFAULT")?);

    for (tag, key) in &config.senders.tag_keys {
        let var = format!("RY_SENDER_KEY_{}", tag.env_suffix());
        registry.insert(*tag, wallet(key, &var)?);
    }
    Ok(registry)
}

fn wallet(key: &SecretKey, var: &str) -> Result<Wallet> {
    Wallet::from_hex_key(key.expose()).with_context(|| format!("{} is not a valid private key", var))
}

fn parse_address(raw: &str, var: &str) -> Result<Address> {
    Address::from_hex(raw).with_context(|| format!("{} is not a valid address", var))
}

fn transaction_sender(rpc_url: &str, key: &SecretKey, var: &str) -> Result<Arc<TransactionSender>> {
    let rpc = JsonRpcClient::new(RpcConfig::new(rpc_url))
        .with_context(|| format!("Failed to create RPC client for {}", rpc_url))?;
    Ok(Arc::new(TransactionSender::new(
        Arc::new(rpc),
        wallet(key, var)?,
        ReceiptPolling::default(),
    )))
}
