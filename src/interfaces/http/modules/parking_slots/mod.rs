//! Parking slots: CRUD, statistics and the sensor-reading entry point

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
