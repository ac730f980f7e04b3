//! Distance sensors: CRUD, filters and direct slot reconciliation

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
