//! Database entities module

pub mod admission_guard;
pub mod arduino;
pub mod hold_payment;
pub mod parking_activity;
pub mod parking_payment;
pub mod parking_slot;
pub mod sensor;
pub mod user;
pub mod vehicle_service;

pub use admission_guard::Entity as AdmissionGuard;
pub use arduino::Entity as Arduino;
pub use hold_payment::Entity as HoldPayment;
pub use parking_activity::Entity as ParkingActivity;
pub use parking_payment::Entity as ParkingPayment;
pub use parking_slot::Entity as ParkingSlot;
pub use sensor::Entity as Sensor;
pub use user::Entity as User;
pub use vehicle_service::Entity as VehicleService;
