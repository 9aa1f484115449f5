//! Registry adapters.

pub mod sign_protocol;

pub use sign_protocol::SignProtocolAttestor;
