//! SeaORM implementation of ParkingSlotRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::debug;

use super::{ensure_exists, parse_column};
use crate::domain::parking_slot::{
    NewParkingSlot, ParkingSlot, ParkingSlotFilter, ParkingSlotPatch, ParkingSlotRepository,
    SlotStats, SlotStatus,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{parking_slot, sensor};
use crate::infrastructure::database::Store;

pub struct SeaOrmParkingSlotRepository {
    store: Store,
}

impl SeaOrmParkingSlotRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

fn parse_status(id: i32, value: Option<&str>) -> DomainResult<Option<SlotStatus>> {
    value
        .map(|v| parse_column("parking_slots", id, v))
        .transpose()
}

fn model_to_domain(m: parking_slot::Model) -> DomainResult<ParkingSlot> {
    let status = parse_status(m.id, m.status.as_deref())?;
    Ok(ParkingSlot {
        id: m.id,
        location: m.location,
        status,
        sensor_id: m.sensor_id,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

#[async_trait]
impl ParkingSlotRepository for SeaOrmParkingSlotRepository {
    async fn create(&self, new: NewParkingSlot) -> DomainResult<ParkingSlot> {
        new.validate()?;

        let db = self.store.connection();
        self.store
            .run("parking_slots.create", async move {
                if let Some(sensor_id) = new.sensor_id {
                    ensure_exists::<sensor::Entity, _>(db, "Sensor", sensor_id).await?;
                }
                let now = Utc::now();
                let model = parking_slot::ActiveModel {
                    location: Set(new.location),
                    status: Set(Some(new.status.as_str().to_string())),
                    sensor_id: Set(new.sensor_id),
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

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ParkingSlot>> {
        let db = self.store.connection();
        self.store
            .run("parking_slots.find_by_id", async move {
                parking_slot::Entity::find_by_id(id)
                    .one(db)
                    .await?
                    .map(model_to_domain)
                    .transpose()
            })
            .await
    }

    async fn find_all(&self, filter: &ParkingSlotFilter) -> DomainResult<Vec<ParkingSlot>> {
        let mut query = parking_slot::Entity::find();
        if let Some(location) = &filter.location {
            query = query.filter(parking_slot::Column::Location.contains(location.as_str()));
        }
        if let Some(status) = filter.status {
            query = query.filter(parking_slot::Column::Status.eq(status.as_str()));
        }
        if let Some(sensor_id) = filter.sensor_id {
            query = query.filter(parking_slot::Column::SensorId.eq(sensor_id));
        }

        let db = self.store.connection();
        self.store
            .run("parking_slots.find_all", async move {
                query
                    .order_by_asc(parking_slot::Column::Id)
                    .all(db)
                    .await?
                    .into_iter()
                    .map(model_to_domain)
                    .collect()
            })
            .await
    }

    async fn find_by_sensor(&self, sensor_id: i32) -> DomainResult<Vec<ParkingSlot>> {
        let db = self.store.connection();
        self.store
            .run("parking_slots.find_by_sensor", async move {
                parking_slot::Entity::find()
                    .filter(parking_slot::Column::SensorId.eq(sensor_id))
                    .order_by_asc(parking_slot::Column::Id)
                    .all(db)
                    .await?
                    .into_iter()
                    .map(model_to_domain)
                    .collect()
            })
            .await
    }

    async fn update(&self, id: i32, patch: &ParkingSlotPatch) -> DomainResult<ParkingSlot> {
        patch.validate()?;

        let mut update = parking_slot::Entity::update_many()
            .col_expr(parking_slot::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(parking_slot::Column::Id.eq(id));
        if let Some(location) = &patch.location {
            update = update.col_expr(parking_slot::Column::Location, Expr::value(location.clone()));
        }
        if let Some(status) = patch.status {
            update = update.col_expr(parking_slot::Column::Status, Expr::value(status.as_str()));
        }
        if let Some(sensor_id) = patch.sensor_id {
            update = update.col_expr(parking_slot::Column::SensorId, Expr::value(sensor_id));
        }

        let db = self.store.connection();
        let sensor_id = patch.sensor_id.flatten();
        self.store
            .run("parking_slots.update", async move {
                if let Some(sensor_id) = sensor_id {
                    ensure_exists::<sensor::Entity, _>(db, "Sensor", sensor_id).await?;
                }
                if update.exec(db).await?.rows_affected == 0 {
                    return Err(DomainError::not_found("ParkingSlot", id));
                }
                parking_slot::Entity::find_by_id(id)
                    .one(db)
                    .await?
                    .ok_or_else(|| DomainError::not_found("ParkingSlot", id))
                    .and_then(model_to_domain)
            })
            .await
    }

    async fn update_status(&self, id: i32, status: SlotStatus) -> DomainResult<()> {
        debug!(slot_id = id, status = %status, "Writing slot status");

        let db = self.store.connection();
        self.store
            .run("parking_slots.update_status", async move {
                let result = parking_slot::Entity::update_many()
                    .col_expr(parking_slot::Column::Status, Expr::value(status.as_str()))
                    .col_expr(parking_slot::Column::UpdatedAt, Expr::value(Utc::now()))
                    .filter(parking_slot::Column::Id.eq(id))
                    .exec(db)
                    .await?;
                if result.rows_affected == 0 {
                    return Err(DomainError::not_found("ParkingSlot", id));
                }
                Ok(())
            })
            .await
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let db = self.store.connection();
        self.store
            .run("parking_slots.delete", async move {
                let result = parking_slot::Entity::delete_by_id(id).exec(db).await?;
                if result.rows_affected == 0 {
                    return Err(DomainError::not_found("ParkingSlot", id));
                }
                Ok(())
            })
            .await
    }

    async fn stats(&self) -> DomainResult<SlotStats> {
        let db = self.store.connection();
        self.store
            .run("parking_slots.stats", async move {
                let rows: Vec<(i32, Option<String>)> = parking_slot::Entity::find()
                    .select_only()
                    .column(parking_slot::Column::Id)
                    .column(parking_slot::Column::Status)
                    .into_tuple()
                    .all(db)
                    .await?;
                let statuses = rows
                    .iter()
                    .map(|(id, status)| parse_status(*id, status.as_deref()))
                    .collect::<DomainResult<Vec<_>>>()?;
                Ok(SlotStats::from_statuses(statuses))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::repositories::test_support::memory_store;

    fn new_slot(location: &str, status: SlotStatus) -> NewParkingSlot {
        NewParkingSlot {
            location: location.into(),
            status,
            sensor_id: None,
        }
    }

    #[tokio::test]
    async fn missing_sensor_is_not_found() {
        let repo = SeaOrmParkingSlotRepository::new(memory_store().await);
        let mut new = new_slot("A-01", SlotStatus::Available);
        new.sensor_id = Some(3);

        let err = repo.create(new).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Sensor", .. }));
    }

    #[tokio::test]
    async fn stats_count_each_status() {
        let repo = SeaOrmParkingSlotRepository::new(memory_store().await);
        repo.create(new_slot("A-01", SlotStatus::Available)).await.unwrap();
        repo.create(new_slot("A-02", SlotStatus::Available)).await.unwrap();
        let busy = repo.create(new_slot("A-03", SlotStatus::Available)).await.unwrap();
        repo.update_status(busy.id, SlotStatus::Occupied).await.unwrap();

        let stats = repo.stats().await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.available, 2);
        assert_eq!(stats.occupied, 1);
        assert_eq!(stats.maintenance, 0);
    }

    #[tokio::test]
    async fn list_is_ordered_and_filtered() {
        let repo = SeaOrmParkingSlotRepository::new(memory_store().await);
        repo.create(new_slot("B-02", SlotStatus::Occupied)).await.unwrap();
        repo.create(new_slot("B-01", SlotStatus::Available)).await.unwrap();
        repo.create(new_slot("C-01", SlotStatus::Available)).await.unwrap();

        let all = repo.find_all(&ParkingSlotFilter::default()).await.unwrap();
        let ids: Vec<i32> = all.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let filter = ParkingSlotFilter {
            location: Some("B-".into()),
            status: Some(SlotStatus::Available),
            ..Default::default()
        };
        let found = repo.find_all(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].location, "B-01");
    }

    #[tokio::test]
    async fn location_edit_keeps_reconciled_status() {
        let repo = SeaOrmParkingSlotRepository::new(memory_store().await);
        let slot = repo.create(new_slot("E-01", SlotStatus::Available)).await.unwrap();
        repo.update_status(slot.id, SlotStatus::Occupied).await.unwrap();

        let saved = repo
            .update(
                slot.id,
                &ParkingSlotPatch {
                    location: Some("E-01 (covered)".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(saved.location, "E-01 (covered)");
        assert_eq!(saved.status, Some(SlotStatus::Occupied));
    }
}
