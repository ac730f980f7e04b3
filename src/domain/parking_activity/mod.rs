//! Parking activity aggregate

pub mod model;
pub mod repository;

pub use model::{
    ActivityStats, NewParkingActivity, ParkingActivity, ParkingActivityFilter,
    ParkingActivityPatch,
};
pub use repository::ParkingActivityRepository;
