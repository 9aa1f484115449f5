//! Dispatch domain: templates, sender identities, policy and reports.

pub mod config;
pub mod errors;
pub mod report;
pub mod senders;
pub mod templates;
