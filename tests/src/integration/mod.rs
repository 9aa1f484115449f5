//! # Integration Flows
//!
//! Each module drives several crates together through their public APIs.

pub mod fixtures;

#[cfg(test)]
mod analysis_flow;
#[cfg(test)]
mod gateway_flow;
#[cfg(test)]
mod relay_flow;
#[cfg(test)]
mod subscription_flow;
