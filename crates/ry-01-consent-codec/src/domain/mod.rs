//! Pure consent domain logic.

pub mod errors;
pub mod message;
pub mod proof;
pub mod verify;
