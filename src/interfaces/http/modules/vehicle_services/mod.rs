//! Priced parking services per vehicle type

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
