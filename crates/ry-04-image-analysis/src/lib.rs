//! # RY-04 Image Analysis
//!
//! Asks an on-chain inference oracle whether a photo is real and which tags
//! describe it.
//!
//! ```text
//! analyze(ref) ─→ startChat(prompt, [gateway/ref]) ─→ chatId
//!                                                       │
//!              ┌──────── wait initial delay ◄───────────┘
//!              ▼
//!      getMessageHistory(chatId) ── no assistant reply ──→ back off, poll again
//!              │                                           (bounded: Timeout)
//!              ▼
//!      parse JSON ─→ validate keys ─→ keep enumerated tags ─→ AnalysisResult
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::galadriel::{GaladrielOracle, DEFAULT_ORACLE_ADDRESS, DEFAULT_ORACLE_RPC_URL};
pub use domain::analysis::{parse_analysis, AnalysisResult};
pub use domain::config::{AnalysisConfig, PollingConfig};
pub use domain::errors::AnalysisError;
pub use domain::prompt::{image_url, ANALYSIS_PROMPT, DEFAULT_IPFS_GATEWAY};
pub use ports::outbound::{InferenceOracle, OracleContent, OracleMessage};
pub use service::ImageAnalysisRelay;
