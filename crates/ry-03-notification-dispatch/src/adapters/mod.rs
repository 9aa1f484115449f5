//! Adapters for the outbound ports.

pub mod relay;
pub mod store;

pub use relay::{HttpRelayTransport, RelayConfig};
