//! Image analysis domain.

pub mod analysis;
pub mod config;
pub mod errors;
pub mod prompt;
