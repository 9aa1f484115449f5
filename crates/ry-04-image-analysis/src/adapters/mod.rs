//! Oracle adapters.

pub mod galadriel;

pub use galadriel::GaladrielOracle;
