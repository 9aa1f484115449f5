//! # Subsystem Container
//!
//! Central container holding all subsystem instances with their lifetime
//! tied to the node.
//!
//! - Subsystems are initialized in dependency order (store first, gateway last)
//! - Optional subsystems are wired only when their credentials are configured

pub mod config;
pub mod subsystems;

pub use config::{ConfigError, NodeConfig, StoreBackend};
pub use subsystems::SubsystemContainer;
