//! Vehicle service aggregate (pricing per vehicle type)

pub mod model;
pub mod repository;

pub use model::{
    normalize_vehicle_type, NewVehicleService, ServiceUsage, VehicleService, VehicleServicePatch,
};
pub use repository::VehicleServiceRepository;
