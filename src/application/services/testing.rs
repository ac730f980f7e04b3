//! Repository wrappers that inject write failures, for cascade tests, and
//! that can land a competing status write right before a patch is stored.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::arduino::ArduinoRepository;
use crate::domain::hold_payment::HoldPaymentRepository;
use crate::domain::parking_activity::ParkingActivityRepository;
use crate::domain::parking_payment::ParkingPaymentRepository;
use crate::domain::parking_slot::{
    NewParkingSlot, ParkingSlot, ParkingSlotFilter, ParkingSlotPatch, ParkingSlotRepository,
    SlotStats, SlotStatus,
};
use crate::domain::sensor::{
    DeviceStatus, NewSensor, Sensor, SensorFilter, SensorPatch, SensorRepository,
};
use crate::domain::user::UserRepository;
use crate::domain::vehicle_service::VehicleServiceRepository;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::infrastructure::database::repositories::{
    SeaOrmParkingSlotRepository, SeaOrmSensorRepository,
};
use crate::infrastructure::{SeaOrmRepositoryProvider, Store};

#[derive(Default)]
struct Faults {
    failing: Mutex<HashSet<i32>>,
    writes: AtomicUsize,
}

impl Faults {
    fn check(&self, id: i32) -> DomainResult<()> {
        if self.failing.lock().unwrap().contains(&id) {
            return Err(DomainError::Storage(format!("injected failure for {}", id)));
        }
        Ok(())
    }
}

pub struct FlakySlots {
    inner: SeaOrmParkingSlotRepository,
    faults: Faults,
    racing_status: Mutex<Option<SlotStatus>>,
}

#[async_trait]
impl ParkingSlotRepository for FlakySlots {
    async fn create(&self, slot: NewParkingSlot) -> DomainResult<ParkingSlot> {
        self.inner.create(slot).await
    }
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ParkingSlot>> {
        self.inner.find_by_id(id).await
    }
    async fn find_all(&self, filter: &ParkingSlotFilter) -> DomainResult<Vec<ParkingSlot>> {
        self.inner.find_all(filter).await
    }
    async fn find_by_sensor(&self, sensor_id: i32) -> DomainResult<Vec<ParkingSlot>> {
        self.inner.find_by_sensor(sensor_id).await
    }
    async fn update(&self, id: i32, patch: &ParkingSlotPatch) -> DomainResult<ParkingSlot> {
        let racing = self.racing_status.lock().unwrap().take();
        if let Some(status) = racing {
            self.inner.update_status(id, status).await?;
        }
        self.inner.update(id, patch).await
    }
    async fn update_status(&self, id: i32, status: SlotStatus) -> DomainResult<()> {
        self.faults.check(id)?;
        self.inner.update_status(id, status).await?;
        self.faults.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
    async fn delete(&self, id: i32) -> DomainResult<()> {
        self.inner.delete(id).await
    }
    async fn stats(&self) -> DomainResult<SlotStats> {
        self.inner.stats().await
    }
}

pub struct FlakySensors {
    inner: SeaOrmSensorRepository,
    faults: Faults,
    racing_status: Mutex<Option<DeviceStatus>>,
}

#[async_trait]
impl SensorRepository for FlakySensors {
    async fn create(&self, sensor: NewSensor) -> DomainResult<Sensor> {
        self.inner.create(sensor).await
    }
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Sensor>> {
        self.inner.find_by_id(id).await
    }
    async fn find_all(&self, filter: &SensorFilter) -> DomainResult<Vec<Sensor>> {
        self.inner.find_all(filter).await
    }
    async fn find_by_arduino(&self, arduino_id: i32) -> DomainResult<Vec<Sensor>> {
        self.inner.find_by_arduino(arduino_id).await
    }
    async fn update(&self, id: i32, patch: &SensorPatch) -> DomainResult<Sensor> {
        let racing = self.racing_status.lock().unwrap().take();
        if let Some(status) = racing {
            self.inner.update_status(id, status).await?;
        }
        self.inner.update(id, patch).await
    }
    async fn update_status(&self, id: i32, status: DeviceStatus) -> DomainResult<()> {
        self.faults.check(id)?;
        self.inner.update_status(id, status).await?;
        self.faults.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
    async fn delete(&self, id: i32) -> DomainResult<()> {
        self.inner.delete(id).await
    }
}

/// Real SQLite-backed repositories, except that slot and sensor status
/// writes can be made to fail per id.
pub struct FlakyRepos {
    inner: SeaOrmRepositoryProvider,
    slots: FlakySlots,
    sensors: FlakySensors,
}

impl FlakyRepos {
    pub fn new(store: Store) -> Self {
        Self {
            slots: FlakySlots {
                inner: SeaOrmParkingSlotRepository::new(store.clone()),
                faults: Faults::default(),
                racing_status: Mutex::new(None),
            },
            sensors: FlakySensors {
                inner: SeaOrmSensorRepository::new(store.clone()),
                faults: Faults::default(),
                racing_status: Mutex::new(None),
            },
            inner: SeaOrmRepositoryProvider::new(store),
        }
    }

    pub fn fail_slot(&self, id: i32) {
        self.slots.faults.failing.lock().unwrap().insert(id);
    }

    pub fn fail_sensor(&self, id: i32) {
        self.sensors.faults.failing.lock().unwrap().insert(id);
    }

    /// The next sensor patch finds `status` already written underneath it,
    /// as if the Arduino cascade got there first.
    pub fn race_sensor_update_with(&self, status: DeviceStatus) {
        *self.sensors.racing_status.lock().unwrap() = Some(status);
    }

    /// Same for the next slot patch, as if a reconciliation got there first.
    pub fn race_slot_update_with(&self, status: SlotStatus) {
        *self.slots.racing_status.lock().unwrap() = Some(status);
    }

    pub fn slot_writes(&self) -> usize {
        self.slots.faults.writes.load(Ordering::SeqCst)
    }

    pub fn sensor_writes(&self) -> usize {
        self.sensors.faults.writes.load(Ordering::SeqCst)
    }
}

impl RepositoryProvider for FlakyRepos {
    fn arduinos(&self) -> &dyn ArduinoRepository {
        self.inner.arduinos()
    }
    fn sensors(&self) -> &dyn SensorRepository {
        &self.sensors
    }
    fn parking_slots(&self) -> &dyn ParkingSlotRepository {
        &self.slots
    }
    fn vehicle_services(&self) -> &dyn VehicleServiceRepository {
        self.inner.vehicle_services()
    }
    fn users(&self) -> &dyn UserRepository {
        self.inner.users()
    }
    fn parking_activities(&self) -> &dyn ParkingActivityRepository {
        self.inner.parking_activities()
    }
    fn hold_payments(&self) -> &dyn HoldPaymentRepository {
        self.inner.hold_payments()
    }
    fn parking_payments(&self) -> &dyn ParkingPaymentRepository {
        self.inner.parking_payments()
    }
}
