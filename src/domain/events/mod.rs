//! Domain event types

pub mod types;

pub use types::*;
