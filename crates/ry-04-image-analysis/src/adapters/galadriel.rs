//! # Galadriel Chat Oracle
//!
//! ```text
//! startChat(string message, string[] imageUrls) -> emits ChatCreated(owner, chatId)
//! getMessageHistory(uint256 chatId) -> (string role, (string contentType, string value)[])[]
//! ```

use crate::domain::errors::AnalysisError;
use crate::ports::outbound::{InferenceOracle, OracleContent, OracleMessage};
use async_trait::async_trait;
use shared_chain::abi::decode;
use shared_chain::{encode_call, event_topic, CallRequest, ParamType, Token, TransactionSender, U256};
use shared_types::Address;
use std::sync::Arc;
use tracing::{debug, info};

/// Galadriel devnet RPC.
pub const DEFAULT_ORACLE_RPC_URL: &str = "https://devnet.galadriel.com";
/// Deployed chat contract.
pub const DEFAULT_ORACLE_ADDRESS: &str = "0xF6b705595E95c8D94E22B38570e79f8BaFa39558";

const START_CHAT: &str = "startChat(string,string[])";
const GET_MESSAGE_HISTORY: &str = "getMessageHistory(uint256)";
const CHAT_CREATED: &str = "ChatCreated(address,uint256)";

/// Oracle adapter over a chat contract.
pub struct GaladrielOracle {
    sender: Arc<TransactionSender>,
    contract: Address,
}

impl GaladrielOracle {
    pub fn new(sender: Arc<TransactionSender>, contract: Address) -> Self {
        Self { sender, contract }
    }

    pub fn contract(&self) -> Address {
        self.contract
    }
}

#[async_trait]
impl InferenceOracle for GaladrielOracle {
    async fn start_chat(&self, prompt: &str, image_urls: &[String]) -> Result<U256, AnalysisError> {
        let urls = image_urls.iter().cloned().map(Token::String).collect();
        let data = encode_call(START_CHAT, &[Token::String(prompt.to_string()), Token::Array(urls)]);

        let receipt = self.sender.send(self.contract, data).await?;
        let log = receipt
            .find_log(&self.contract, &event_topic(CHAT_CREATED))
            .ok_or_else(|| {
                AnalysisError::Oracle(format!(
                    "no ChatCreated event in transaction {}",
                    receipt.transaction_hash
                ))
            })?;
        // ChatCreated(address indexed owner, uint256 indexed chatId)
        let chat_id = log.topic_uint(2)?;

        info!(chat_id = %chat_id, tx_hash = %receipt.transaction_hash, "Oracle chat started");
        Ok(chat_id)
    }

    async fn message_history(&self, chat_id: U256) -> Result<Vec<OracleMessage>, AnalysisError> {
        let data = encode_call(GET_MESSAGE_HISTORY, &[Token::Uint(chat_id)]);
        let request = CallRequest::new(self.contract, &data).from(self.sender.address());
        let raw = self.sender.rpc().eth_call(&request).await?;

        let messages = decode_history(&raw)?;
        debug!(chat_id = %chat_id, messages = messages.len(), "Oracle history read");
        Ok(messages)
    }
}

fn history_type() -> ParamType {
    let content = ParamType::Tuple(vec![ParamType::String, ParamType::String]);
    let message = ParamType::Tuple(vec![
        ParamType::String,
        ParamType::Array(Box::new(content)),
    ]);
    ParamType::Array(Box::new(message))
}

fn decode_history(raw: &[u8]) -> Result<Vec<OracleMessage>, AnalysisError> {
    let malformed = |e: shared_chain::AbiError| AnalysisError::Oracle(format!("bad history: {}", e));

    let mut tokens = decode(&[history_type()], raw).map_err(malformed)?;
    let list = tokens
        .pop()
        .ok_or_else(|| AnalysisError::Oracle("empty history".to_string()))?
        .into_array()
        .map_err(malformed)?;

    list.into_iter()
        .map(|message| {
            let mut fields = message.into_tuple().map_err(malformed)?.into_iter();
            let (role, content) = match (fields.next(), fields.next()) {
                (Some(role), Some(content)) => (role, content),
                _ => return Err(AnalysisError::Oracle("short message tuple".to_string())),
            };

            let content = content
                .into_array()
                .map_err(malformed)?
                .into_iter()
                .map(|part| {
                    let mut part = part.into_tuple().map_err(malformed)?.into_iter();
                    match (part.next(), part.next()) {
                        (Some(content_type), Some(value)) => Ok(OracleContent {
                            content_type: content_type.into_string().map_err(malformed)?,
                            value: value.into_string().map_err(malformed)?,
                        }),
                        _ => Err(AnalysisError::Oracle("short content tuple".to_string())),
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok(OracleMessage {
                role: role.into_string().map_err(malformed)?,
                content,
            })
        })
        .collect()
}
