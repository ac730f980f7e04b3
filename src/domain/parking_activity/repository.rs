//! Parking activity repository interface

use async_trait::async_trait;

use super::model::{NewParkingActivity, ParkingActivity, ParkingActivityFilter};
use crate::domain::DomainResult;

#[async_trait]
pub trait ParkingActivityRepository: Send + Sync {
    /// Insert an activity. `NotFound` on a missing user or slot; `Conflict`
    /// when the user already has an activity without end time.
    async fn create(&self, activity: NewParkingActivity) -> DomainResult<ParkingActivity>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ParkingActivity>>;
    async fn find_all(&self, filter: &ParkingActivityFilter) -> DomainResult<Vec<ParkingActivity>>;
    /// Persist every field. Reopening a session is a `Conflict` when the user
    /// already has another one running.
    async fn update(&self, activity: &ParkingActivity) -> DomainResult<ParkingActivity>;
    /// Delete an activity. `Conflict` while parking payments reference it.
    async fn delete(&self, id: i32) -> DomainResult<()>;
}
