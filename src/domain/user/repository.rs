//! User repository interface

use async_trait::async_trait;

use super::model::{NewUser, User, UserFilter};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. `Conflict` on a duplicate plate, `NotFound` on a missing service.
    async fn create(&self, user: NewUser) -> DomainResult<User>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>>;
    async fn find_all(&self, filter: &UserFilter) -> DomainResult<Vec<User>>;
    async fn update(&self, user: &User) -> DomainResult<User>;
    /// Delete a user. `Conflict` while activities or payments reference it.
    async fn delete(&self, id: i32) -> DomainResult<()>;
}
