//! SeaORM implementation of RepositoryProvider

use crate::domain::arduino::ArduinoRepository;
use crate::domain::hold_payment::HoldPaymentRepository;
use crate::domain::parking_activity::ParkingActivityRepository;
use crate::domain::parking_payment::ParkingPaymentRepository;
use crate::domain::parking_slot::ParkingSlotRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::sensor::SensorRepository;
use crate::domain::user::UserRepository;
use crate::domain::vehicle_service::VehicleServiceRepository;
use crate::infrastructure::database::Store;

use super::arduino_repository::SeaOrmArduinoRepository;
use super::hold_payment_repository::SeaOrmHoldPaymentRepository;
use super::parking_activity_repository::SeaOrmParkingActivityRepository;
use super::parking_payment_repository::SeaOrmParkingPaymentRepository;
use super::parking_slot_repository::SeaOrmParkingSlotRepository;
use super::sensor_repository::SeaOrmSensorRepository;
use super::user_repository::SeaOrmUserRepository;
use super::vehicle_service_repository::SeaOrmVehicleServiceRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one store handle and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(store.clone());
/// let slots = repos.parking_slots().find_by_sensor(4).await?;
/// let (available, pending) = repos.hold_payments().availability().await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    store: Store,
    arduinos: SeaOrmArduinoRepository,
    sensors: SeaOrmSensorRepository,
    parking_slots: SeaOrmParkingSlotRepository,
    vehicle_services: SeaOrmVehicleServiceRepository,
    users: SeaOrmUserRepository,
    parking_activities: SeaOrmParkingActivityRepository,
    hold_payments: SeaOrmHoldPaymentRepository,
    parking_payments: SeaOrmParkingPaymentRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(store: Store) -> Self {
        Self {
            arduinos: SeaOrmArduinoRepository::new(store.clone()),
            sensors: SeaOrmSensorRepository::new(store.clone()),
            parking_slots: SeaOrmParkingSlotRepository::new(store.clone()),
            vehicle_services: SeaOrmVehicleServiceRepository::new(store.clone()),
            users: SeaOrmUserRepository::new(store.clone()),
            parking_activities: SeaOrmParkingActivityRepository::new(store.clone()),
            hold_payments: SeaOrmHoldPaymentRepository::new(store.clone()),
            parking_payments: SeaOrmParkingPaymentRepository::new(store.clone()),
            store,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn arduinos(&self) -> &dyn ArduinoRepository {
        &self.arduinos
    }

    fn sensors(&self) -> &dyn SensorRepository {
        &self.sensors
    }

    fn parking_slots(&self) -> &dyn ParkingSlotRepository {
        &self.parking_slots
    }

    fn vehicle_services(&self) -> &dyn VehicleServiceRepository {
        &self.vehicle_services
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn parking_activities(&self) -> &dyn ParkingActivityRepository {
        &self.parking_activities
    }

    fn hold_payments(&self) -> &dyn HoldPaymentRepository {
        &self.hold_payments
    }

    fn parking_payments(&self) -> &dyn ParkingPaymentRepository {
        &self.parking_payments
    }
}
