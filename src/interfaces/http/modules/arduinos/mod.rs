//! Arduino hubs: CRUD, filters and the attached-sensor listing

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
