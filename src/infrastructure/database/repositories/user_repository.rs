//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::debug;

use super::{conflict_on_unique, ensure_exists};
use crate::domain::user::{NewUser, User, UserFilter, UserRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{
    hold_payment, parking_activity, parking_payment, user, vehicle_service,
};
use crate::infrastructure::database::Store;

pub struct SeaOrmUserRepository {
    store: Store,
}

impl SeaOrmUserRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

fn model_to_domain(m: user::Model) -> User {
    User {
        id: m.id,
        first_name: m.first_name,
        last_name: m.last_name,
        plate_number: m.plate_number,
        contact_number: m.contact_number,
        service_id: m.service_id,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn duplicate_plate(plate: &str) -> String {
    format!("User with plate_number {} already exists", plate)
}

async fn ensure_plate_free<C: ConnectionTrait>(
    db: &C,
    plate: &str,
    except_id: Option<i32>,
) -> DomainResult<()> {
    let mut query = user::Entity::find().filter(user::Column::PlateNumber.eq(plate));
    if let Some(id) = except_id {
        query = query.filter(user::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(DomainError::Conflict(duplicate_plate(plate)));
    }
    Ok(())
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, new: NewUser) -> DomainResult<User> {
        let new = new.normalize()?;

        let db = self.store.connection();
        self.store
            .run("users.create", async move {
                ensure_plate_free(db, &new.plate_number, None).await?;
                if let Some(service_id) = new.service_id {
                    ensure_exists::<vehicle_service::Entity, _>(db, "Service", service_id).await?;
                }
                let now = Utc::now();
                let plate = new.plate_number.clone();
                let model = user::ActiveModel {
                    first_name: Set(new.first_name),
                    last_name: Set(new.last_name),
                    plate_number: Set(new.plate_number),
                    contact_number: Set(new.contact_number),
                    service_id: Set(new.service_id),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(db)
                .await
                .map_err(|e| conflict_on_unique(e, || duplicate_plate(&plate)))?;
                debug!(user_id = model.id, plate = %model.plate_number, "User created");
                Ok(model_to_domain(model))
            })
            .await
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        let db = self.store.connection();
        self.store
            .run("users.find_by_id", async move {
                Ok(user::Entity::find_by_id(id).one(db).await?.map(model_to_domain))
            })
            .await
    }

    async fn find_all(&self, filter: &UserFilter) -> DomainResult<Vec<User>> {
        let mut query = user::Entity::find();
        if let Some(plate) = &filter.plate_number {
            query = query.filter(user::Column::PlateNumber.eq(plate.trim().to_uppercase()));
        }
        if let Some(search) = &filter.plate_search {
            query = query.filter(user::Column::PlateNumber.contains(search.trim().to_uppercase()));
        }
        if let Some(service_id) = filter.service_id {
            query = query.filter(user::Column::ServiceId.eq(service_id));
        }

        let db = self.store.connection();
        self.store
            .run("users.find_all", async move {
                Ok(query
                    .order_by_asc(user::Column::Id)
                    .all(db)
                    .await?
                    .into_iter()
                    .map(model_to_domain)
                    .collect())
            })
            .await
    }

    async fn update(&self, u: &User) -> DomainResult<User> {
        let db = self.store.connection();
        self.store
            .run("users.update", async move {
                let existing = user::Entity::find_by_id(u.id)
                    .one(db)
                    .await?
                    .ok_or_else(|| DomainError::not_found("User", u.id))?;
                ensure_plate_free(db, &u.plate_number, Some(u.id)).await?;
                if let Some(service_id) = u.service_id {
                    ensure_exists::<vehicle_service::Entity, _>(db, "Service", service_id).await?;
                }

                let mut active: user::ActiveModel = existing.into();
                active.first_name = Set(u.first_name.clone());
                active.last_name = Set(u.last_name.clone());
                active.plate_number = Set(u.plate_number.clone());
                active.contact_number = Set(u.contact_number.clone());
                active.service_id = Set(u.service_id);
                active.updated_at = Set(u.updated_at);
                let model = active
                    .update(db)
                    .await
                    .map_err(|e| conflict_on_unique(e, || duplicate_plate(&u.plate_number)))?;
                Ok(model_to_domain(model))
            })
            .await
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let db = self.store.connection();
        self.store
            .run("users.delete", async move {
                let activities = parking_activity::Entity::find()
                    .filter(parking_activity::Column::UserId.eq(id))
                    .count(db)
                    .await?;
                let holds = hold_payment::Entity::find()
                    .filter(hold_payment::Column::UserId.eq(id))
                    .count(db)
                    .await?;
                let payments = parking_payment::Entity::find()
                    .filter(parking_payment::Column::UserId.eq(id))
                    .count(db)
                    .await?;
                if activities + holds + payments > 0 {
                    return Err(DomainError::Conflict(format!(
                        "User {} still has {} activity(ies), {} hold payment(s) and {} parking payment(s)",
                        id, activities, holds, payments
                    )));
                }

                let result = user::Entity::delete_by_id(id).exec(db).await?;
                if result.rows_affected == 0 {
                    return Err(DomainError::not_found("User", id));
                }
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::repositories::test_support::memory_store;

    fn new_user(plate: &str) -> NewUser {
        NewUser {
            first_name: "Juan".into(),
            last_name: "Dela Cruz".into(),
            plate_number: plate.into(),
            contact_number: Some("09171234567".into()),
            service_id: None,
        }
    }

    #[tokio::test]
    async fn duplicate_plate_after_normalisation_is_a_conflict() {
        let repo = SeaOrmUserRepository::new(memory_store().await);
        let first = repo.create(new_user("abc  1234")).await.unwrap();
        assert_eq!(first.plate_number, "ABC 1234");

        let err = repo.create(new_user("ABC 1234")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn plate_search_is_case_insensitive() {
        let repo = SeaOrmUserRepository::new(memory_store().await);
        repo.create(new_user("NAB 4411")).await.unwrap();
        repo.create(new_user("XYZ 9000")).await.unwrap();

        let filter = UserFilter {
            plate_search: Some("nab".into()),
            ..Default::default()
        };
        let found = repo.find_all(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].plate_number, "NAB 4411");
    }

    #[tokio::test]
    async fn unknown_service_is_not_found() {
        let repo = SeaOrmUserRepository::new(memory_store().await);
        let mut new = new_user("QWE 111");
        new.service_id = Some(8);
        let err = repo.create(new).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Service", .. }));
    }
}
