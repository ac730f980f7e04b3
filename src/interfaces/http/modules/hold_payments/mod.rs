//! Hold payments and the slot-budget admission endpoint

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
