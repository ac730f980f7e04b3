//! Hold payment repository interface

use async_trait::async_trait;

use super::model::{AvailabilitySnapshot, HoldPayment, HoldPaymentFilter, NewHoldPayment};
use crate::domain::DomainResult;

#[async_trait]
pub trait HoldPaymentRepository: Send + Sync {
    /// Count available slots and pending holds, apply [`super::admit`] and
    /// insert, all as one atomic unit. Concurrent callers are serialised so
    /// the slot budget can never be overshot.
    async fn create_admitted(
        &self,
        hold: NewHoldPayment,
    ) -> DomainResult<(HoldPayment, AvailabilitySnapshot)>;
    /// Current `(available_slots, pending_holds)` counts
    async fn availability(&self) -> DomainResult<(u64, u64)>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<HoldPayment>>;
    async fn find_all(&self, filter: &HoldPaymentFilter) -> DomainResult<Vec<HoldPayment>>;
    async fn update(&self, hold: &HoldPayment) -> DomainResult<HoldPayment>;
    async fn delete(&self, id: i32) -> DomainResult<()>;
}
