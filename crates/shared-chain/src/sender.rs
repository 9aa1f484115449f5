//! Signs and submits contract calls from a single wallet.

use crate::errors::ChainError;
use crate::rpc::JsonRpcClient;
use crate::tx::LegacyTransaction;
use crate::types::{CallRequest, ReceiptPolling, TransactionReceipt};
use primitive_types::U256;
use shared_crypto::Wallet;
use shared_types::Address;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Transaction submitter. Submissions from one sender are serialized so
/// nonces are not reused.
pub struct TransactionSender {
    rpc: Arc<JsonRpcClient>,
    wallet: Wallet,
    polling: ReceiptPolling,
    nonce_lock: Mutex<()>,
}

impl TransactionSender {
    pub fn new(rpc: Arc<JsonRpcClient>, wallet: Wallet, polling: ReceiptPolling) -> Self {
        Self {
            rpc,
            wallet,
            polling,
            nonce_lock: Mutex::new(()),
        }
    }

    pub fn rpc(&self) -> &Arc<JsonRpcClient> {
        &self.rpc
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// Send `data` to `to`, wait for the receipt and fail on revert.
    pub async fn send(&self, to: Address, data: Vec<u8>) -> Result<TransactionReceipt, ChainError> {
        let tx_hash = {
            let _guard = self.nonce_lock.lock().await;
            let from = self.wallet.address();

            let chain_id = self.rpc.chain_id().await?;
            let nonce = self.rpc.transaction_count(&from).await?;
            let gas_price = self.rpc.gas_price().await?;
            let estimate = self
                .rpc
                .estimate_gas(&CallRequest::new(to, &data).from(from))
                .await?;
            // 20% headroom over the estimate
            let gas_limit = estimate.saturating_mul(U256::from(12)) / U256::from(10);

            let tx = LegacyTransaction {
                nonce,
                gas_price,
                gas_limit,
                to,
                value: U256::zero(),
                data,
                chain_id,
            };
            let raw = tx.sign(&self.wallet)?;
            debug!(%from, %to, %nonce, %gas_limit, chain_id, "submitting transaction");
            self.rpc.send_raw_transaction(&raw).await?
        };

        info!(tx_hash = %tx_hash, "transaction submitted");
        let receipt = self.rpc.wait_for_receipt(&tx_hash, &self.polling).await?;
        if !receipt.succeeded() {
            return Err(ChainError::TransactionReverted { tx_hash });
        }
        Ok(receipt)
    }
}
