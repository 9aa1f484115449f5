//! # Real You Test Suite
//!
//! Cross-crate flows that no single crate can test on its own.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/
//! │   ├── fixtures.rs            # Shared stubs: oracle, attestor, wallets
//! │   ├── subscription_flow.rs   # subscribe → store → dispatch → proof
//! │   ├── relay_flow.rs          # dispatch over the HTTP relay (wiremock)
//! │   ├── analysis_flow.rs       # oracle polling → validated tags
//! │   └── gateway_flow.rs        # full HTTP surface over a real store
//! └── benches/
//!     └── subsystem_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ry-tests
//! cargo bench -p ry-tests
//! ```

pub mod integration;
