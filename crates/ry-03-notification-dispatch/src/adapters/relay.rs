//! # HTTP Relay Transport
//!
//! Talks to a messaging relay that fronts the messaging network:
//!
//! ```text
//! POST {base}/v1/conversations               {from, to, consentProof} -> {conversationId}
//! POST {base}/v1/conversations/{id}/messages {from, text}
//! ```
//!
//! Every request carries `X-Sender-Signature`, the sender's EIP-191 signature
//! over the exact request body, and a bearer token when one is configured.

use crate::domain::errors::TransportError;
use crate::ports::outbound::{ChannelId, MessagingSession, MessagingTransport};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared_crypto::Wallet;
use std::time::Duration;
use tracing::debug;

/// Header holding the sender's signature over the body.
pub const SENDER_SIGNATURE_HEADER: &str = "X-Sender-Signature";

/// Relay endpoint settings.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub request_timeout: Duration,
}

impl RelayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            request_timeout: Duration::from_secs(15),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OpenConversationRequest<'a> {
    from: &'a str,
    to: &'a str,
    consent_proof: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenConversationResponse {
    conversation_id: String,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    from: &'a str,
    text: &'a str,
}

/// Relay-backed transport.
pub struct HttpRelayTransport {
    client: Client,
    config: RelayConfig,
}

impl HttpRelayTransport {
    pub fn new(config: RelayConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl MessagingTransport for HttpRelayTransport {
    async fn connect(&self, sender: &Wallet) -> Result<Box<dyn MessagingSession>, TransportError> {
        debug!(sender = %sender.address(), relay = %self.config.base_url, "Opening relay session");
        Ok(Box::new(RelaySession {
            client: self.client.clone(),
            base_url: self.config.base_url.trim_end_matches('/').to_string(),
            token: self.config.token.clone(),
            from: sender.address().to_checksum(),
            sender: sender.clone(),
            closed: false,
        }))
    }
}

struct RelaySession {
    client: Client,
    base_url: String,
    token: Option<String>,
    from: String,
    sender: Wallet,
    closed: bool,
}

impl RelaySession {
    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<reqwest::Response, TransportError> {
        if self.closed {
            return Err(TransportError::SessionClosed);
        }

        let payload =
            serde_json::to_vec(body).map_err(|e| TransportError::InvalidResponse(e.to_string()))?;
        let signature = self
            .sender
            .sign_message(&payload)
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        let mut request = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(SENDER_SIGNATURE_HEADER, signature.to_hex())
            .body(payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() {
                TransportError::Connect(format!("Cannot connect to {}", self.base_url))
            } else {
                TransportError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl MessagingSession for RelaySession {
    async fn open_channel(
        &mut self,
        peer: &str,
        consent_proof: &[u8],
    ) -> Result<ChannelId, TransportError> {
        let body = OpenConversationRequest {
            from: &self.from,
            to: peer,
            consent_proof: BASE64.encode(consent_proof),
        };
        let response: OpenConversationResponse = self
            .post("/v1/conversations", &body)
            .await?
            .json()
            .await
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;

        Ok(ChannelId(response.conversation_id))
    }

    async fn send(&mut self, channel: &ChannelId, text: &str) -> Result<(), TransportError> {
        let body = SendMessageRequest {
            from: &self.from,
            text,
        };
        self.post(&format!("/v1/conversations/{}/messages", channel), &body)
            .await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.closed = true;
        Ok(())
    }
}
