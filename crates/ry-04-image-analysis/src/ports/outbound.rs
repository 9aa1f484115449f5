//! # Outbound Ports

use crate::domain::errors::AnalysisError;
use async_trait::async_trait;
use shared_chain::U256;

/// One content part of an oracle message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleContent {
    pub content_type: String,
    pub value: String,
}

/// One message of an oracle conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleMessage {
    pub role: String,
    pub content: Vec<OracleContent>,
}

impl OracleMessage {
    /// Text of an assistant reply, if this is one.
    pub fn assistant_text(&self) -> Option<&str> {
        if self.role != "assistant" {
            return None;
        }
        self.content
            .iter()
            .find(|c| c.content_type == "text")
            .or_else(|| self.content.first())
            .map(|c| c.value.as_str())
            .filter(|v| !v.is_empty())
    }
}

/// Asynchronous inference service: a request is started, the answer is
/// appended to the conversation later.
#[async_trait]
pub trait InferenceOracle: Send + Sync {
    /// Start a conversation. Returns its id.
    async fn start_chat(&self, prompt: &str, image_urls: &[String]) -> Result<U256, AnalysisError>;

    /// Current messages of a conversation.
    async fn message_history(&self, chat_id: U256) -> Result<Vec<OracleMessage>, AnalysisError>;
}
