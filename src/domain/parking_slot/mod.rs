//! Parking slot aggregate

pub mod model;
pub mod reconciliation;
pub mod repository;

pub use model::{
    NewParkingSlot, ParkingSlot, ParkingSlotFilter, ParkingSlotPatch, SlotStats, SlotStatus,
};
pub use reconciliation::{reconcile, Reconciliation, OCCUPANCY_THRESHOLD_CM};
pub use repository::ParkingSlotRepository;
