//! Vehicle service repository interface

use async_trait::async_trait;

use super::model::{NewVehicleService, ServiceUsage, VehicleService};
use crate::domain::DomainResult;

#[async_trait]
pub trait VehicleServiceRepository: Send + Sync {
    /// Insert a service. `Conflict` on a duplicate vehicle type.
    async fn create(&self, service: NewVehicleService) -> DomainResult<VehicleService>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<VehicleService>>;
    async fn find_all(&self) -> DomainResult<Vec<VehicleService>>;
    async fn update(&self, service: &VehicleService) -> DomainResult<VehicleService>;
    /// Delete a service. `Conflict` while users are enrolled in it.
    async fn delete(&self, id: i32) -> DomainResult<()>;
    async fn usage(&self) -> DomainResult<Vec<ServiceUsage>>;
}
