//! JSON-RPC client for EVM nodes.
//!
//! Connect and timeout failures are retried with a capped exponential
//! back-off; JSON-RPC error objects are returned immediately.

use crate::errors::ChainError;
use crate::types::{decode_hex, parse_quantity, CallRequest, ReceiptPolling, TransactionReceipt};
use primitive_types::U256;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared_types::Address;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Client configuration.
#[derive(Debug, Clone)]
pub struct RpcConfig {
    pub url: String,
    pub timeout: Duration,
    pub retry_max: u32,
}

impl RpcConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(15),
            retry_max: 3,
        }
    }
}

#[derive(Serialize)]
struct JsonRpcRequest<'a, P> {
    jsonrpc: &'static str,
    method: &'a str,
    params: P,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<JsonRpcErrorObject>,
}

#[derive(Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

/// EVM JSON-RPC client.
pub struct JsonRpcClient {
    client: Client,
    config: RpcConfig,
    request_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(config: RpcConfig) -> Result<Self, ChainError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            client,
            config,
            request_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Call a JSON-RPC method. A `null` result is returned as `Value::Null`.
    pub async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, ChainError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: self.next_id(),
        };

        let attempts = self.config.retry_max.max(1);
        let mut attempt = 1;
        let response = loop {
            debug!(method, attempt, url = %self.config.url, "sending rpc request");
            match self.client.post(&self.config.url).json(&request).send().await {
                Ok(response) => break response,
                Err(err) if attempt < attempts && is_retryable(&err) => {
                    warn!(method, attempt, error = %err, "rpc request error");
                    backoff(method, attempt).await;
                    attempt += 1;
                }
                Err(err) if err.is_connect() => {
                    return Err(ChainError::Connection(format!(
                        "cannot connect to {}",
                        self.config.url
                    )))
                }
                Err(err) => return Err(ChainError::Http(err)),
            }
        };

        let response = response.error_for_status()?;
        let body: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| ChainError::InvalidResponse(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(ChainError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        serde_json::from_value(body.result.unwrap_or(serde_json::Value::Null))
            .map_err(|e| ChainError::InvalidResponse(format!("{}: {}", method, e)))
    }

    pub async fn chain_id(&self) -> Result<u64, ChainError> {
        let raw: String = self.call("eth_chainId", [(); 0]).await?;
        let id = parse_quantity(&raw)?;
        if id.bits() > 64 {
            return Err(ChainError::InvalidResponse(format!("chain id too large: {}", raw)));
        }
        Ok(id.low_u64())
    }

    pub async fn transaction_count(&self, address: &Address) -> Result<U256, ChainError> {
        let raw: String = self
            .call(
                "eth_getTransactionCount",
                (address.to_checksum(), "pending"),
            )
            .await?;
        parse_quantity(&raw)
    }

    pub async fn gas_price(&self) -> Result<U256, ChainError> {
        let raw: String = self.call("eth_gasPrice", [(); 0]).await?;
        parse_quantity(&raw)
    }

    pub async fn estimate_gas(&self, request: &CallRequest) -> Result<U256, ChainError> {
        let raw: String = self.call("eth_estimateGas", (request,)).await?;
        parse_quantity(&raw)
    }

    /// Submit a signed transaction and return its hash.
    pub async fn send_raw_transaction(&self, raw: &[u8]) -> Result<String, ChainError> {
        self.call(
            "eth_sendRawTransaction",
            (format!("0x{}", hex::encode(raw)),),
        )
        .await
    }

    pub async fn transaction_receipt(
        &self,
        tx_hash: &str,
    ) -> Result<Option<TransactionReceipt>, ChainError> {
        self.call("eth_getTransactionReceipt", (tx_hash,)).await
    }

    /// Read-only contract call against the latest block.
    pub async fn eth_call(&self, request: &CallRequest) -> Result<Vec<u8>, ChainError> {
        let raw: String = self.call("eth_call", (request, "latest")).await?;
        decode_hex(&raw)
    }

    /// Poll until the receipt for `tx_hash` is available.
    pub async fn wait_for_receipt(
        &self,
        tx_hash: &str,
        polling: &ReceiptPolling,
    ) -> Result<TransactionReceipt, ChainError> {
        for attempt in 1..=polling.max_attempts {
            if let Some(receipt) = self.transaction_receipt(tx_hash).await? {
                debug!(tx_hash, attempt, "receipt available");
                return Ok(receipt);
            }
            sleep(polling.interval).await;
        }

        Err(ChainError::ReceiptTimeout {
            tx_hash: tx_hash.to_string(),
            attempts: polling.max_attempts,
        })
    }
}

fn is_retryable(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

async fn backoff(method: &str, attempt: u32) {
    let delay_ms = backoff_delay_ms(attempt);
    warn!(method, attempt, delay_ms, "retrying after backoff");
    sleep(Duration::from_millis(delay_ms)).await;
}

fn backoff_delay_ms(attempt: u32) -> u64 {
    let exp = attempt.saturating_sub(1);
    let base = 100u64.saturating_mul(2u64.saturating_pow(exp));
    base.min(2_000)
}
