//! Context helpers shared by the skillport crates' error types.

pub mod error;

pub use error::FromMessage;
