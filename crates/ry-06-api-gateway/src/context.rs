//! Shared handler state.
//!
//! Built once at startup and handed to every handler. The subscription store
//! and the sender registry are always present; the dispatcher and the two
//! relays are present only when their credentials were configured.

use crate::middleware::GatewayMetrics;
use ry_02_subscription_store::SubscriptionStore;
use ry_03_notification_dispatch::{NotificationDispatcher, TagSenderRegistry};
use ry_04_image_analysis::ImageAnalysisRelay;
use ry_05_attestation::AttestationRelay;
use std::sync::Arc;

pub struct GatewayContext {
    store: SubscriptionStore,
    senders: Arc<TagSenderRegistry>,
    dispatcher: Option<Arc<NotificationDispatcher>>,
    analysis: Option<Arc<ImageAnalysisRelay>>,
    attestation: Option<Arc<AttestationRelay>>,
    verify_consent: bool,
    metrics: Arc<GatewayMetrics>,
    service_name: String,
}

impl GatewayContext {
    pub fn new(store: SubscriptionStore, senders: Arc<TagSenderRegistry>) -> Self {
        Self {
            store,
            senders,
            dispatcher: None,
            analysis: None,
            attestation: None,
            verify_consent: false,
            metrics: Arc::new(GatewayMetrics::new()),
            service_name: "real-you".to_string(),
        }
    }

    pub fn with_dispatcher(mut self, dispatcher: Arc<NotificationDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn with_analysis(mut self, relay: Arc<ImageAnalysisRelay>) -> Self {
        self.analysis = Some(relay);
        self
    }

    pub fn with_attestation(mut self, relay: Arc<AttestationRelay>) -> Self {
        self.attestation = Some(relay);
        self
    }

    /// Require `/subscribe` signatures to recover to the subscriber address.
    pub fn with_consent_verification(mut self, enabled: bool) -> Self {
        self.verify_consent = enabled;
        self
    }

    pub(crate) fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    pub fn store(&self) -> &SubscriptionStore {
        &self.store
    }

    pub fn senders(&self) -> &TagSenderRegistry {
        &self.senders
    }

    pub fn dispatcher(&self) -> Option<&NotificationDispatcher> {
        self.dispatcher.as_deref()
    }

    pub fn analysis(&self) -> Option<&ImageAnalysisRelay> {
        self.analysis.as_deref()
    }

    pub fn attestation(&self) -> Option<&AttestationRelay> {
        self.attestation.as_deref()
    }

    pub fn verifies_consent(&self) -> bool {
        self.verify_consent
    }

    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}
