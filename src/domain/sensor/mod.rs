//! Sensor aggregate
//!
//! Distance sensors, their health, and the readings that drive slot occupancy.

pub mod model;
pub mod repository;

pub use model::{
    validate_distance, DeviceStatus, NewSensor, Sensor, SensorFilter, SensorPatch, SensorReading,
    MAX_DISTANCE_CM,
};
pub use repository::SensorRepository;
