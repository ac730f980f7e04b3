//! Repository traits for the domain layer
//!
//! `RepositoryProvider` gives unified access to all per-aggregate
//! repositories. Consumers request only the repository they need:
//!
//! ```ignore
//! async fn handle(repos: &dyn RepositoryProvider) -> DomainResult<()> {
//!     let slots = repos.parking_slots().find_by_sensor(4).await?;
//!     let sensor = repos.sensors().find_by_id(4).await?;
//!     Ok(())
//! }
//! ```

use super::arduino::ArduinoRepository;
use super::hold_payment::HoldPaymentRepository;
use super::parking_activity::ParkingActivityRepository;
use super::parking_payment::ParkingPaymentRepository;
use super::parking_slot::ParkingSlotRepository;
use super::sensor::SensorRepository;
use super::user::UserRepository;
use super::vehicle_service::VehicleServiceRepository;

pub use crate::shared::errors::DomainResult;

pub trait RepositoryProvider: Send + Sync {
    fn arduinos(&self) -> &dyn ArduinoRepository;
    fn sensors(&self) -> &dyn SensorRepository;
    fn parking_slots(&self) -> &dyn ParkingSlotRepository;
    fn vehicle_services(&self) -> &dyn VehicleServiceRepository;
    fn users(&self) -> &dyn UserRepository;
    fn parking_activities(&self) -> &dyn ParkingActivityRepository;
    fn hold_payments(&self) -> &dyn HoldPaymentRepository;
    fn parking_payments(&self) -> &dyn ParkingPaymentRepository;
}
