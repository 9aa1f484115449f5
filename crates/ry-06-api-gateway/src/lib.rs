//! RY-06 API Gateway - HTTP interface of the Real You node.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                       API GATEWAY (ry-06)                        │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  Cors → Tracing → RateLimit → BodyLimit → Timeout*               │
//! │                               │                                  │
//! │  ┌──────────────┬─────────────┼──────────────┬────────────────┐  │
//! │  │ /subscribe   │ /notify     │ /gpt4vision  │ /createAttest. │  │
//! │  │ /user..      │             │              │                │  │
//! │  │ /getSubs..   │             │              │                │  │
//! │  │ /consentMsg  │             │              │                │  │
//! │  └──────┬───────┴──────┬──────┴───────┬──────┴────────┬───────┘  │
//! └─────────┼──────────────┼──────────────┼───────────────┼──────────┘
//!           ▼              ▼              ▼               ▼
//!     ry-02-store   ry-03-dispatch   ry-04-analysis  ry-05-attestation
//! ```
//!
//! `*` `/notify` and `/gpt4vision` are not wrapped by the timeout layer: the
//! dispatcher paces itself and the analysis relay bounds its own polling.
//!
//! Every error response is `{"error": "<message>"}`. Unsupported verbs on a
//! known path get `405` with an `Allow` header.
//!
//! # Usage
//!
//! ```ignore
//! use ry_06_api_gateway::{ApiGatewayService, GatewayConfig, GatewayContext};
//!
//! let context = GatewayContext::new(store, senders).with_dispatcher(dispatcher);
//! let service = ApiGatewayService::new(GatewayConfig::default(), context)?;
//! service.run(shutdown_signal()).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod context;
pub mod domain;
pub mod handlers;
pub mod middleware;
pub mod service;

pub use context::GatewayContext;
pub use domain::config::{ConfigError, GatewayConfig};
pub use domain::error::{ApiError, ApiResult, GatewayError};
pub use domain::types::*;
pub use middleware::GatewayMetrics;
pub use service::ApiGatewayService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
