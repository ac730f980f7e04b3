//! SeaORM implementation of ParkingPaymentRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use super::{ensure_exists, parse_column};
use crate::domain::parking_payment::{
    NewParkingPayment, ParkingPayment, ParkingPaymentFilter, ParkingPaymentRepository,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{parking_activity, parking_payment, user};
use crate::infrastructure::database::Store;

pub struct SeaOrmParkingPaymentRepository {
    store: Store,
}

impl SeaOrmParkingPaymentRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

fn model_to_domain(m: parking_payment::Model) -> DomainResult<ParkingPayment> {
    let payment_method = parse_column("parking_payments", m.id, &m.payment_method)?;
    Ok(ParkingPayment {
        id: m.id,
        user_id: m.user_id,
        activity_id: m.activity_id,
        amount: m.amount,
        payment_method,
        paid_at: m.paid_at,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

#[async_trait]
impl ParkingPaymentRepository for SeaOrmParkingPaymentRepository {
    async fn create(&self, new: NewParkingPayment) -> DomainResult<ParkingPayment> {
        new.validate()?;

        let db = self.store.connection();
        self.store
            .run("parking_payments.create", async move {
                ensure_exists::<user::Entity, _>(db, "User", new.user_id).await?;
                if let Some(activity_id) = new.activity_id {
                    ensure_exists::<parking_activity::Entity, _>(db, "ParkingActivity", activity_id)
                        .await?;
                }
                let now = Utc::now();
                let model = parking_payment::ActiveModel {
                    user_id: Set(new.user_id),
                    activity_id: Set(new.activity_id),
                    amount: Set(new.amount),
                    payment_method: Set(new.payment_method.as_str().to_string()),
                    paid_at: Set(new.paid_at),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(db)
                .await?;
                model_to_domain(model)
            })
            .await
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ParkingPayment>> {
        let db = self.store.connection();
        self.store
            .run("parking_payments.find_by_id", async move {
                parking_payment::Entity::find_by_id(id)
                    .one(db)
                    .await?
                    .map(model_to_domain)
                    .transpose()
            })
            .await
    }

    async fn find_all(&self, filter: &ParkingPaymentFilter) -> DomainResult<Vec<ParkingPayment>> {
        filter.range.validate()?;

        let mut query = parking_payment::Entity::find();
        if let Some(user_id) = filter.user_id {
            query = query.filter(parking_payment::Column::UserId.eq(user_id));
        }
        if let Some(activity_id) = filter.activity_id {
            query = query.filter(parking_payment::Column::ActivityId.eq(activity_id));
        }
        if let Some(method) = filter.payment_method {
            query = query.filter(parking_payment::Column::PaymentMethod.eq(method.as_str()));
        }
        if let Some(min) = filter.range.min_amount {
            query = query.filter(parking_payment::Column::Amount.gte(min));
        }
        if let Some(max) = filter.range.max_amount {
            query = query.filter(parking_payment::Column::Amount.lte(max));
        }
        if let Some(from) = filter.range.from {
            query = query.filter(parking_payment::Column::PaidAt.gte(from));
        }
        if let Some(to) = filter.range.to {
            query = query.filter(parking_payment::Column::PaidAt.lte(to));
        }

        let db = self.store.connection();
        self.store
            .run("parking_payments.find_all", async move {
                query
                    .order_by_asc(parking_payment::Column::Id)
                    .all(db)
                    .await?
                    .into_iter()
                    .map(model_to_domain)
                    .collect()
            })
            .await
    }

    async fn update(&self, p: &ParkingPayment) -> DomainResult<ParkingPayment> {
        let db = self.store.connection();
        self.store
            .run("parking_payments.update", async move {
                let existing = parking_payment::Entity::find_by_id(p.id)
                    .one(db)
                    .await?
                    .ok_or_else(|| DomainError::not_found("ParkingPayment", p.id))?;
                if let Some(activity_id) = p.activity_id {
                    ensure_exists::<parking_activity::Entity, _>(db, "ParkingActivity", activity_id)
                        .await?;
                }

                let mut active: parking_payment::ActiveModel = existing.into();
                active.activity_id = Set(p.activity_id);
                active.amount = Set(p.amount);
                active.payment_method = Set(p.payment_method.as_str().to_string());
                active.paid_at = Set(p.paid_at);
                active.updated_at = Set(p.updated_at);
                model_to_domain(active.update(db).await?)
            })
            .await
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let db = self.store.connection();
        self.store
            .run("parking_payments.delete", async move {
                let result = parking_payment::Entity::delete_by_id(id).exec(db).await?;
                if result.rows_affected == 0 {
                    return Err(DomainError::not_found("ParkingPayment", id));
                }
                Ok(())
            })
            .await
    }
}
