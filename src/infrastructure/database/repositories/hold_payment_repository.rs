//! SeaORM implementation of HoldPaymentRepository
//!
//! Admission runs in one transaction that first bumps the admission guard
//! row. The write lock taken there orders concurrent admissions, so every
//! count read afterwards already includes the holds committed before it.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info};

use super::{ensure_exists, parse_column};
use crate::domain::hold_payment::{
    admit, AvailabilitySnapshot, HoldPayment, HoldPaymentFilter, HoldPaymentRepository,
    NewHoldPayment,
};
use crate::domain::parking_slot::SlotStatus;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::admission_guard::{self, GUARD_ROW_ID};
use crate::infrastructure::database::entities::{hold_payment, parking_slot, user};
use crate::infrastructure::database::Store;

pub struct SeaOrmHoldPaymentRepository {
    store: Store,
}

impl SeaOrmHoldPaymentRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

fn model_to_domain(m: hold_payment::Model) -> DomainResult<HoldPayment> {
    let payment_method = parse_column("hold_payments", m.id, &m.payment_method)?;
    Ok(HoldPayment {
        id: m.id,
        user_id: m.user_id,
        amount: m.amount,
        payment_method,
        is_done: m.is_done,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

/// Holds whose `is_done` is NULL or false
fn pending_condition() -> Condition {
    Condition::any()
        .add(hold_payment::Column::IsDone.is_null())
        .add(hold_payment::Column::IsDone.eq(false))
}

async fn count_availability<C: ConnectionTrait>(db: &C) -> DomainResult<(u64, u64)> {
    let available = parking_slot::Entity::find()
        .filter(parking_slot::Column::Status.eq(SlotStatus::Available.as_str()))
        .count(db)
        .await?;
    let pending = hold_payment::Entity::find()
        .filter(pending_condition())
        .count(db)
        .await?;
    Ok((available, pending))
}

/// Guard bump, count and insert. Runs inside the caller's transaction.
async fn insert_admitted(
    txn: &DatabaseTransaction,
    new: NewHoldPayment,
) -> DomainResult<(hold_payment::Model, AvailabilitySnapshot)> {
    admission_guard::Entity::update_many()
        .col_expr(
            admission_guard::Column::Generation,
            Expr::col(admission_guard::Column::Generation).add(1),
        )
        .filter(admission_guard::Column::Id.eq(GUARD_ROW_ID))
        .exec(txn)
        .await?;

    ensure_exists::<user::Entity, _>(txn, "User", new.user_id).await?;

    let (available, pending) = count_availability(txn).await?;
    let snapshot = admit(available, pending)?;

    let now = Utc::now();
    let model = hold_payment::ActiveModel {
        user_id: Set(new.user_id),
        amount: Set(new.amount),
        payment_method: Set(new.payment_method.as_str().to_string()),
        is_done: Set(Some(false)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(txn)
    .await?;
    Ok((model, snapshot))
}

#[async_trait]
impl HoldPaymentRepository for SeaOrmHoldPaymentRepository {
    async fn create_admitted(
        &self,
        new: NewHoldPayment,
    ) -> DomainResult<(HoldPayment, AvailabilitySnapshot)> {
        let db = self.store.connection();
        self.store
            .run("hold_payments.create_admitted", async move {
                let txn = db.begin().await?;
                match insert_admitted(&txn, new).await {
                    Ok((model, snapshot)) => {
                        txn.commit().await?;
                        info!(
                            hold_payment_id = model.id,
                            available = snapshot.available_count,
                            pending = snapshot.pending_count,
                            "Hold payment admitted"
                        );
                        Ok((model_to_domain(model)?, snapshot))
                    }
                    Err(e) => {
                        txn.rollback().await?;
                        Err(e)
                    }
                }
            })
            .await
    }

    async fn availability(&self) -> DomainResult<(u64, u64)> {
        let db = self.store.connection();
        self.store
            .run("hold_payments.availability", count_availability(db))
            .await
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<HoldPayment>> {
        let db = self.store.connection();
        self.store
            .run("hold_payments.find_by_id", async move {
                hold_payment::Entity::find_by_id(id)
                    .one(db)
                    .await?
                    .map(model_to_domain)
                    .transpose()
            })
            .await
    }

    async fn find_all(&self, filter: &HoldPaymentFilter) -> DomainResult<Vec<HoldPayment>> {
        filter.range.validate()?;

        let mut query = hold_payment::Entity::find();
        if let Some(user_id) = filter.user_id {
            query = query.filter(hold_payment::Column::UserId.eq(user_id));
        }
        if let Some(method) = filter.payment_method {
            query = query.filter(hold_payment::Column::PaymentMethod.eq(method.as_str()));
        }
        if let Some(min) = filter.range.min_amount {
            query = query.filter(hold_payment::Column::Amount.gte(min));
        }
        if let Some(max) = filter.range.max_amount {
            query = query.filter(hold_payment::Column::Amount.lte(max));
        }
        if let Some(from) = filter.range.from {
            query = query.filter(hold_payment::Column::CreatedAt.gte(from));
        }
        if let Some(to) = filter.range.to {
            query = query.filter(hold_payment::Column::CreatedAt.lte(to));
        }
        match filter.pending {
            Some(true) => query = query.filter(pending_condition()),
            Some(false) => query = query.filter(hold_payment::Column::IsDone.eq(true)),
            None => {}
        }

        let db = self.store.connection();
        self.store
            .run("hold_payments.find_all", async move {
                query
                    .order_by_asc(hold_payment::Column::Id)
                    .all(db)
                    .await?
                    .into_iter()
                    .map(model_to_domain)
                    .collect()
            })
            .await
    }

    async fn update(&self, hold: &HoldPayment) -> DomainResult<HoldPayment> {
        debug!(hold_payment_id = hold.id, is_done = ?hold.is_done, "Updating hold payment");

        let db = self.store.connection();
        self.store
            .run("hold_payments.update", async move {
                let existing = hold_payment::Entity::find_by_id(hold.id)
                    .one(db)
                    .await?
                    .ok_or_else(|| DomainError::not_found("HoldPayment", hold.id))?;

                let mut active: hold_payment::ActiveModel = existing.into();
                active.amount = Set(hold.amount);
                active.payment_method = Set(hold.payment_method.as_str().to_string());
                active.is_done = Set(hold.is_done);
                active.updated_at = Set(hold.updated_at);
                model_to_domain(active.update(db).await?)
            })
            .await
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let db = self.store.connection();
        self.store
            .run("hold_payments.delete", async move {
                let result = hold_payment::Entity::delete_by_id(id).exec(db).await?;
                if result.rows_affected == 0 {
                    return Err(DomainError::not_found("HoldPayment", id));
                }
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::parking_slot::{NewParkingSlot, ParkingSlotRepository};
    use crate::domain::payment::PaymentMethod;
    use crate::domain::user::{NewUser, UserRepository};
    use crate::infrastructure::database::repositories::test_support::{
        file_store, memory_store, remove_file_store,
    };
    use crate::infrastructure::database::repositories::{
        SeaOrmParkingSlotRepository, SeaOrmUserRepository,
    };

    async fn seed(store: &Store, available_slots: usize) -> i32 {
        let slots = SeaOrmParkingSlotRepository::new(store.clone());
        for n in 0..available_slots {
            slots
                .create(NewParkingSlot {
                    location: format!("A-{:02}", n),
                    status: SlotStatus::Available,
                    sensor_id: None,
                })
                .await
                .unwrap();
        }
        SeaOrmUserRepository::new(store.clone())
            .create(NewUser {
                first_name: "Ria".into(),
                last_name: "Tan".into(),
                plate_number: "RIA 5".into(),
                contact_number: None,
                service_id: None,
            })
            .await
            .unwrap()
            .id
    }

    fn hold(user_id: i32) -> NewHoldPayment {
        NewHoldPayment::new(user_id, 50.0, PaymentMethod::Gcash).unwrap()
    }

    #[tokio::test]
    async fn admits_until_pending_reaches_available() {
        let store = memory_store().await;
        let user_id = seed(&store, 5).await;
        let repo = SeaOrmHoldPaymentRepository::new(store);

        for _ in 0..4 {
            repo.create_admitted(hold(user_id)).await.unwrap();
        }
        assert_eq!(repo.availability().await.unwrap(), (5, 4));

        let (_, snapshot) = repo.create_admitted(hold(user_id)).await.unwrap();
        assert_eq!(snapshot.available_count, 5);
        assert_eq!(snapshot.pending_count, 5);
        assert_eq!(snapshot.remaining, 0);

        let err = repo.create_admitted(hold(user_id)).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::AdmissionDenied {
                available: 5,
                pending: 5
            }
        ));
        assert_eq!(repo.find_all(&HoldPaymentFilter::default()).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn completed_holds_free_capacity() {
        let store = memory_store().await;
        let user_id = seed(&store, 1).await;
        let repo = SeaOrmHoldPaymentRepository::new(store);

        let (mut first, _) = repo.create_admitted(hold(user_id)).await.unwrap();
        assert!(repo.create_admitted(hold(user_id)).await.is_err());

        first.is_done = Some(true);
        repo.update(&first).await.unwrap();
        repo.create_admitted(hold(user_id)).await.unwrap();

        let pending = repo
            .find_all(&HoldPaymentFilter {
                pending: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let store = memory_store().await;
        seed(&store, 3).await;
        let repo = SeaOrmHoldPaymentRepository::new(store);

        let err = repo.create_admitted(hold(404)).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "User", .. }));
    }

    /// Runs on a file-backed database with a ten-connection pool and a
    /// multi-threaded runtime, so admissions genuinely overlap.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_admissions_never_overshoot() {
        let (store, path) = file_store(10).await;
        let user_id = seed(&store, 5).await;
        let repo = Arc::new(SeaOrmHoldPaymentRepository::new(store.clone()));

        let attempts = (0..40).map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.create_admitted(hold(user_id)).await })
        });
        let results: Vec<_> = futures_util::future::join_all(attempts)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();

        let admitted = results.iter().filter(|r| r.is_ok()).count();
        let denied = results
            .iter()
            .filter(|r| matches!(r, Err(DomainError::AdmissionDenied { .. })))
            .count();
        assert_eq!(admitted, 5);
        assert_eq!(denied, 35);
        assert_eq!(repo.availability().await.unwrap(), (5, 5));
        assert_eq!(repo.find_all(&HoldPaymentFilter::default()).await.unwrap().len(), 5);

        remove_file_store(store, &path).await;
    }
}
