//! Parking payment repository interface

use async_trait::async_trait;

use super::model::{NewParkingPayment, ParkingPayment, ParkingPaymentFilter};
use crate::domain::DomainResult;

#[async_trait]
pub trait ParkingPaymentRepository: Send + Sync {
    /// Insert a payment. Fails with `NotFound` when the user or activity is missing.
    async fn create(&self, payment: NewParkingPayment) -> DomainResult<ParkingPayment>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ParkingPayment>>;
    async fn find_all(&self, filter: &ParkingPaymentFilter) -> DomainResult<Vec<ParkingPayment>>;
    async fn update(&self, payment: &ParkingPayment) -> DomainResult<ParkingPayment>;
    async fn delete(&self, id: i32) -> DomainResult<()>;
}
