//! Sensor repository interface

use async_trait::async_trait;

use super::model::{DeviceStatus, NewSensor, Sensor, SensorFilter, SensorPatch};
use crate::domain::DomainResult;

#[async_trait]
pub trait SensorRepository: Send + Sync {
    /// Insert a sensor. Fails with `NotFound` when the referenced Arduino is missing.
    async fn create(&self, sensor: NewSensor) -> DomainResult<Sensor>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Sensor>>;
    async fn find_all(&self, filter: &SensorFilter) -> DomainResult<Vec<Sensor>>;
    /// Sensors owned by one Arduino
    async fn find_by_arduino(&self, arduino_id: i32) -> DomainResult<Vec<Sensor>>;
    /// Write only the supplied fields in one statement and return the stored
    /// row. Columns the patch leaves out keep whatever value they hold at
    /// write time, including a concurrent `update_status`.
    async fn update(&self, id: i32, patch: &SensorPatch) -> DomainResult<Sensor>;
    /// Direct health write, bypassing reconciliation
    async fn update_status(&self, id: i32, status: DeviceStatus) -> DomainResult<()>;
    /// Delete a sensor. Fails with `Conflict` while any parking slot references it.
    async fn delete(&self, id: i32) -> DomainResult<()>;
}
