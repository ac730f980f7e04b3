//! Domain layer: parking entities, their rules, and repository interfaces

pub mod arduino;
pub mod events;
pub mod hold_payment;
pub mod parking_activity;
pub mod parking_payment;
pub mod parking_slot;
pub mod payment;
pub mod repositories;
pub mod sensor;
pub mod user;
pub mod vehicle_service;

pub use arduino::{Arduino, ArduinoRepository};
pub use hold_payment::{HoldPayment, HoldPaymentRepository};
pub use parking_activity::{ParkingActivity, ParkingActivityRepository};
pub use parking_payment::{ParkingPayment, ParkingPaymentRepository};
pub use parking_slot::{ParkingSlot, ParkingSlotRepository, SlotStatus, OCCUPANCY_THRESHOLD_CM};
pub use payment::PaymentMethod;
pub use repositories::{DomainResult, RepositoryProvider};
pub use sensor::{DeviceStatus, Sensor, SensorReading, SensorRepository};
pub use user::{User, UserRepository};
pub use vehicle_service::{VehicleService, VehicleServiceRepository};

pub use crate::shared::errors::{DomainError, ErrorKind};
