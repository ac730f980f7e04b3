//! Parking slot repository interface

use async_trait::async_trait;

use super::model::{
    NewParkingSlot, ParkingSlot, ParkingSlotFilter, ParkingSlotPatch, SlotStats, SlotStatus,
};
use crate::domain::DomainResult;

#[async_trait]
pub trait ParkingSlotRepository: Send + Sync {
    /// Insert a slot. Fails with `NotFound` when the referenced sensor is missing.
    async fn create(&self, slot: NewParkingSlot) -> DomainResult<ParkingSlot>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ParkingSlot>>;
    async fn find_all(&self, filter: &ParkingSlotFilter) -> DomainResult<Vec<ParkingSlot>>;
    /// Every slot whose monitoring-sensor reference equals `sensor_id`
    async fn find_by_sensor(&self, sensor_id: i32) -> DomainResult<Vec<ParkingSlot>>;
    /// Write only the supplied fields and return the stored row
    async fn update(&self, id: i32, patch: &ParkingSlotPatch) -> DomainResult<ParkingSlot>;
    /// Write only the occupancy status of one slot
    async fn update_status(&self, id: i32, status: SlotStatus) -> DomainResult<()>;
    async fn delete(&self, id: i32) -> DomainResult<()>;
    async fn stats(&self) -> DomainResult<SlotStats>;
}
