//! Arduino repository interface

use async_trait::async_trait;

use super::model::{Arduino, ArduinoFilter, NewArduino};
use crate::domain::DomainResult;

#[async_trait]
pub trait ArduinoRepository: Send + Sync {
    /// Insert a hub. Fails with `Conflict` on a duplicate IP address.
    async fn create(&self, arduino: NewArduino) -> DomainResult<Arduino>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Arduino>>;
    async fn find_all(&self, filter: &ArduinoFilter) -> DomainResult<Vec<Arduino>>;
    /// Persist every field. Fails with `Conflict` when the IP belongs to another hub.
    async fn update(&self, arduino: &Arduino) -> DomainResult<Arduino>;
    /// Delete a hub; its sensors are kept and detached.
    async fn delete(&self, id: i32) -> DomainResult<()>;
}
