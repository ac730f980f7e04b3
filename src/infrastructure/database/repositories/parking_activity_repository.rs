//! SeaORM implementation of ParkingActivityRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::debug;

use super::ensure_exists;
use crate::domain::parking_activity::{
    NewParkingActivity, ParkingActivity, ParkingActivityFilter, ParkingActivityRepository,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{
    parking_activity, parking_payment, parking_slot, user,
};
use crate::infrastructure::database::Store;

pub struct SeaOrmParkingActivityRepository {
    store: Store,
}

impl SeaOrmParkingActivityRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

fn model_to_domain(m: parking_activity::Model) -> ParkingActivity {
    ParkingActivity {
        id: m.id,
        user_id: m.user_id,
        slot_id: m.slot_id,
        start_time: m.start_time,
        end_time: m.end_time,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

/// A user may only have one running session at a time.
async fn ensure_no_open_session<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    except_id: Option<i32>,
) -> DomainResult<()> {
    let mut query = parking_activity::Entity::find()
        .filter(parking_activity::Column::UserId.eq(user_id))
        .filter(parking_activity::Column::EndTime.is_null());
    if let Some(id) = except_id {
        query = query.filter(parking_activity::Column::Id.ne(id));
    }
    if let Some(open) = query.one(db).await? {
        return Err(DomainError::Conflict(format!(
            "User {} already has an active parking activity ({})",
            user_id, open.id
        )));
    }
    Ok(())
}

#[async_trait]
impl ParkingActivityRepository for SeaOrmParkingActivityRepository {
    async fn create(&self, new: NewParkingActivity) -> DomainResult<ParkingActivity> {
        new.validate()?;

        let db = self.store.connection();
        self.store
            .run("parking_activities.create", async move {
                ensure_exists::<user::Entity, _>(db, "User", new.user_id).await?;
                if let Some(slot_id) = new.slot_id {
                    ensure_exists::<parking_slot::Entity, _>(db, "ParkingSlot", slot_id).await?;
                }
                if new.end_time.is_none() {
                    ensure_no_open_session(db, new.user_id, None).await?;
                }

                let now = Utc::now();
                let model = parking_activity::ActiveModel {
                    user_id: Set(new.user_id),
                    slot_id: Set(new.slot_id),
                    start_time: Set(new.start_time),
                    end_time: Set(new.end_time),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(db)
                .await?;
                debug!(activity_id = model.id, user_id = model.user_id, "Parking activity started");
                Ok(model_to_domain(model))
            })
            .await
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ParkingActivity>> {
        let db = self.store.connection();
        self.store
            .run("parking_activities.find_by_id", async move {
                Ok(parking_activity::Entity::find_by_id(id)
                    .one(db)
                    .await?
                    .map(model_to_domain))
            })
            .await
    }

    async fn find_all(&self, filter: &ParkingActivityFilter) -> DomainResult<Vec<ParkingActivity>> {
        filter.validate()?;

        let mut query = parking_activity::Entity::find();
        if let Some(user_id) = filter.user_id {
            query = query.filter(parking_activity::Column::UserId.eq(user_id));
        }
        match filter.active {
            Some(true) => query = query.filter(parking_activity::Column::EndTime.is_null()),
            Some(false) => query = query.filter(parking_activity::Column::EndTime.is_not_null()),
            None => {}
        }
        if let Some(from) = filter.from {
            query = query.filter(parking_activity::Column::StartTime.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(parking_activity::Column::StartTime.lte(to));
        }

        let db = self.store.connection();
        self.store
            .run("parking_activities.find_all", async move {
                Ok(query
                    .order_by_asc(parking_activity::Column::Id)
                    .all(db)
                    .await?
                    .into_iter()
                    .map(model_to_domain)
                    .collect())
            })
            .await
    }

    async fn update(&self, a: &ParkingActivity) -> DomainResult<ParkingActivity> {
        let db = self.store.connection();
        self.store
            .run("parking_activities.update", async move {
                let existing = parking_activity::Entity::find_by_id(a.id)
                    .one(db)
                    .await?
                    .ok_or_else(|| DomainError::not_found("ParkingActivity", a.id))?;
                if let Some(slot_id) = a.slot_id {
                    ensure_exists::<parking_slot::Entity, _>(db, "ParkingSlot", slot_id).await?;
                }
                if a.end_time.is_none() {
                    ensure_no_open_session(db, a.user_id, Some(a.id)).await?;
                }

                let mut active: parking_activity::ActiveModel = existing.into();
                active.slot_id = Set(a.slot_id);
                active.start_time = Set(a.start_time);
                active.end_time = Set(a.end_time);
                active.updated_at = Set(a.updated_at);
                Ok(model_to_domain(active.update(db).await?))
            })
            .await
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let db = self.store.connection();
        self.store
            .run("parking_activities.delete", async move {
                let payments = parking_payment::Entity::find()
                    .filter(parking_payment::Column::ActivityId.eq(id))
                    .count(db)
                    .await?;
                if payments > 0 {
                    return Err(DomainError::Conflict(format!(
                        "Parking activity {} is referenced by {} payment(s)",
                        id, payments
                    )));
                }

                let result = parking_activity::Entity::delete_by_id(id).exec(db).await?;
                if result.rows_affected == 0 {
                    return Err(DomainError::not_found("ParkingActivity", id));
                }
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{NewUser, UserRepository};
    use crate::infrastructure::database::repositories::test_support::memory_store;
    use crate::infrastructure::database::repositories::SeaOrmUserRepository;
    use crate::infrastructure::database::Store;

    async fn seeded_user(store: &Store) -> i32 {
        SeaOrmUserRepository::new(store.clone())
            .create(NewUser {
                first_name: "Lea".into(),
                last_name: "Santos".into(),
                plate_number: "LEA 001".into(),
                contact_number: None,
                service_id: None,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn second_open_session_is_a_conflict() {
        let store = memory_store().await;
        let user_id = seeded_user(&store).await;
        let repo = SeaOrmParkingActivityRepository::new(store);

        let mut first = repo
            .create(NewParkingActivity::start_now(user_id, None))
            .await
            .unwrap();
        let err = repo
            .create(NewParkingActivity::start_now(user_id, None))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        first.finish(Utc::now()).unwrap();
        repo.update(&first).await.unwrap();
        repo.create(NewParkingActivity::start_now(user_id, None))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn active_filter() {
        let store = memory_store().await;
        let user_id = seeded_user(&store).await;
        let repo = SeaOrmParkingActivityRepository::new(store);

        let mut done = repo
            .create(NewParkingActivity::start_now(user_id, None))
            .await
            .unwrap();
        done.finish(Utc::now()).unwrap();
        repo.update(&done).await.unwrap();
        let running = repo
            .create(NewParkingActivity::start_now(user_id, None))
            .await
            .unwrap();

        let filter = ParkingActivityFilter {
            active: Some(true),
            ..Default::default()
        };
        let found = repo.find_all(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, running.id);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let repo = SeaOrmParkingActivityRepository::new(memory_store().await);
        let err = repo
            .create(NewParkingActivity::start_now(77, None))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "User", .. }));
    }
}
