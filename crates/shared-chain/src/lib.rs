//! # Shared Chain
//!
//! Minimal EVM client used by the image-analysis oracle adapter and the
//! attestation adapter.
//!
//! ```text
//! ┌──────────────────┐   encode_call    ┌─────────────┐
//! │  domain adapter  │ ───────────────→ │     abi     │
//! └────────┬─────────┘                  └─────────────┘
//!          │ send(to, data)
//!          ▼
//! ┌──────────────────┐  sign (EIP-155)  ┌─────────────┐
//! │ TransactionSender│ ───────────────→ │     tx      │
//! └────────┬─────────┘                  └─────────────┘
//!          │ eth_sendRawTransaction / eth_getTransactionReceipt
//!          ▼
//! ┌──────────────────┐
//! │  JsonRpcClient   │ ──→ node
//! └──────────────────┘
//! ```

pub mod abi;
pub mod errors;
pub mod rpc;
pub mod sender;
pub mod tx;
pub mod types;

pub use abi::{encode, encode_call, event_topic, selector, ParamType, Token};
pub use errors::{AbiError, ChainError};
pub use primitive_types::U256;
pub use rpc::{JsonRpcClient, RpcConfig};
pub use sender::TransactionSender;
pub use tx::LegacyTransaction;
pub use types::{CallRequest, Log, ReceiptPolling, TransactionReceipt};
