//! SeaORM implementation of SensorRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use super::{ensure_exists, parse_column};
use crate::domain::sensor::{
    DeviceStatus, NewSensor, Sensor, SensorFilter, SensorPatch, SensorRepository,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{arduino, parking_slot, sensor};
use crate::infrastructure::database::Store;

pub struct SeaOrmSensorRepository {
    store: Store,
}

impl SeaOrmSensorRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

fn model_to_domain(m: sensor::Model) -> DomainResult<Sensor> {
    let status = parse_column("sensors", m.id, &m.status)?;
    Ok(Sensor {
        id: m.id,
        sensor_type: m.sensor_type,
        status,
        sensor_range: m.sensor_range,
        arduino_id: m.arduino_id,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

#[async_trait]
impl SensorRepository for SeaOrmSensorRepository {
    async fn create(&self, new: NewSensor) -> DomainResult<Sensor> {
        new.validate()?;

        let db = self.store.connection();
        self.store
            .run("sensors.create", async move {
                if let Some(arduino_id) = new.arduino_id {
                    ensure_exists::<arduino::Entity, _>(db, "Arduino", arduino_id).await?;
                }
                let now = Utc::now();
                let model = sensor::ActiveModel {
                    sensor_type: Set(new.sensor_type),
                    status: Set(new.status.as_str().to_string()),
                    sensor_range: Set(new.sensor_range),
                    arduino_id: Set(new.arduino_id),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(db)
                .await?;
                debug!(sensor_id = model.id, "Sensor created");
                model_to_domain(model)
            })
            .await
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Sensor>> {
        let db = self.store.connection();
        self.store
            .run("sensors.find_by_id", async move {
                sensor::Entity::find_by_id(id)
                    .one(db)
                    .await?
                    .map(model_to_domain)
                    .transpose()
            })
            .await
    }

    async fn find_all(&self, filter: &SensorFilter) -> DomainResult<Vec<Sensor>> {
        let mut query = sensor::Entity::find();
        if let Some(arduino_id) = filter.arduino_id {
            query = query.filter(sensor::Column::ArduinoId.eq(arduino_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(sensor::Column::Status.eq(status.as_str()));
        }

        let db = self.store.connection();
        self.store
            .run("sensors.find_all", async move {
                query
                    .order_by_asc(sensor::Column::Id)
                    .all(db)
                    .await?
                    .into_iter()
                    .map(model_to_domain)
                    .collect()
            })
            .await
    }

    async fn find_by_arduino(&self, arduino_id: i32) -> DomainResult<Vec<Sensor>> {
        let db = self.store.connection();
        self.store
            .run("sensors.find_by_arduino", async move {
                sensor::Entity::find()
                    .filter(sensor::Column::ArduinoId.eq(arduino_id))
                    .order_by_asc(sensor::Column::Id)
                    .all(db)
                    .await?
                    .into_iter()
                    .map(model_to_domain)
                    .collect()
            })
            .await
    }

    async fn update(&self, id: i32, patch: &SensorPatch) -> DomainResult<Sensor> {
        patch.validate()?;
        debug!(sensor_id = id, ?patch, "Updating sensor");

        let mut update = sensor::Entity::update_many()
            .col_expr(sensor::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(sensor::Column::Id.eq(id));
        if let Some(sensor_type) = &patch.sensor_type {
            update = update.col_expr(sensor::Column::SensorType, Expr::value(sensor_type.clone()));
        }
        if let Some(status) = patch.status {
            update = update.col_expr(sensor::Column::Status, Expr::value(status.as_str()));
        }
        if let Some(range) = patch.sensor_range {
            update = update.col_expr(sensor::Column::SensorRange, Expr::value(range));
        }
        if let Some(arduino_id) = patch.arduino_id {
            update = update.col_expr(sensor::Column::ArduinoId, Expr::value(arduino_id));
        }

        let db = self.store.connection();
        let arduino_id = patch.arduino_id.flatten();
        self.store
            .run("sensors.update", async move {
                if let Some(arduino_id) = arduino_id {
                    ensure_exists::<arduino::Entity, _>(db, "Arduino", arduino_id).await?;
                }
                if update.exec(db).await?.rows_affected == 0 {
                    return Err(DomainError::not_found("Sensor", id));
                }
                sensor::Entity::find_by_id(id)
                    .one(db)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Sensor", id))
                    .and_then(model_to_domain)
            })
            .await
    }

    async fn update_status(&self, id: i32, status: DeviceStatus) -> DomainResult<()> {
        let db = self.store.connection();
        self.store
            .run("sensors.update_status", async move {
                let result = sensor::Entity::update_many()
                    .col_expr(sensor::Column::Status, Expr::value(status.as_str()))
                    .col_expr(sensor::Column::UpdatedAt, Expr::value(Utc::now()))
                    .filter(sensor::Column::Id.eq(id))
                    .exec(db)
                    .await?;
                if result.rows_affected == 0 {
                    return Err(DomainError::not_found("Sensor", id));
                }
                Ok(())
            })
            .await
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let db = self.store.connection();
        self.store
            .run("sensors.delete", async move {
                let referencing = parking_slot::Entity::find()
                    .filter(parking_slot::Column::SensorId.eq(id))
                    .count(db)
                    .await?;
                if referencing > 0 {
                    return Err(DomainError::Conflict(format!(
                        "Sensor {} is assigned to {} parking slot(s)",
                        id, referencing
                    )));
                }

                let result = sensor::Entity::delete_by_id(id).exec(db).await?;
                if result.rows_affected == 0 {
                    return Err(DomainError::not_found("Sensor", id));
                }
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parking_slot::{NewParkingSlot, ParkingSlotRepository, SlotStatus};
    use crate::infrastructure::database::repositories::test_support::memory_store;
    use crate::infrastructure::database::repositories::SeaOrmParkingSlotRepository;

    fn new_sensor(range: i32) -> NewSensor {
        NewSensor {
            sensor_type: "HC-SR04".into(),
            status: DeviceStatus::Working,
            sensor_range: range,
            arduino_id: None,
        }
    }

    #[tokio::test]
    async fn unknown_arduino_is_not_found() {
        let repo = SeaOrmSensorRepository::new(memory_store().await);
        let mut new = new_sensor(10);
        new.arduino_id = Some(42);

        let err = repo.create(new).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Arduino", .. }));
    }

    #[tokio::test]
    async fn update_status_only_touches_health() {
        let repo = SeaOrmSensorRepository::new(memory_store().await);
        let sensor = repo.create(new_sensor(120)).await.unwrap();

        repo.update_status(sensor.id, DeviceStatus::Maintenance)
            .await
            .unwrap();

        let reloaded = repo.find_by_id(sensor.id).await.unwrap().unwrap();
        assert_eq!(reloaded.status, DeviceStatus::Maintenance);
        assert_eq!(reloaded.sensor_range, 120);
    }

    #[tokio::test]
    async fn update_status_of_missing_sensor() {
        let repo = SeaOrmSensorRepository::new(memory_store().await);
        let err = repo
            .update_status(5, DeviceStatus::Working)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_referenced_sensor_is_a_conflict() {
        let store = memory_store().await;
        let sensors = SeaOrmSensorRepository::new(store.clone());
        let slots = SeaOrmParkingSlotRepository::new(store);

        let sensor = sensors.create(new_sensor(50)).await.unwrap();
        let slot = slots
            .create(NewParkingSlot {
                location: "A-01".into(),
                status: SlotStatus::Available,
                sensor_id: Some(sensor.id),
            })
            .await
            .unwrap();

        let err = sensors.delete(sensor.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        slots.delete(slot.id).await.unwrap();
        sensors.delete(sensor.id).await.unwrap();
        assert!(sensors.find_by_id(sensor.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn partial_update_keeps_unsupplied_columns() {
        let repo = SeaOrmSensorRepository::new(memory_store().await);
        let sensor = repo.create(new_sensor(120)).await.unwrap();
        repo.update_status(sensor.id, DeviceStatus::Maintenance)
            .await
            .unwrap();

        let saved = repo
            .update(
                sensor.id,
                &SensorPatch {
                    sensor_range: Some(4),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(saved.sensor_range, 4);
        assert_eq!(saved.status, DeviceStatus::Maintenance);
        assert_eq!(saved.sensor_type, "HC-SR04");
    }

    #[tokio::test]
    async fn update_can_detach_and_rejects_unknown_hub() {
        let repo = SeaOrmSensorRepository::new(memory_store().await);
        let sensor = repo.create(new_sensor(10)).await.unwrap();

        let err = repo
            .update(
                sensor.id,
                &SensorPatch {
                    arduino_id: Some(Some(99)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Arduino", .. }));

        let detached = repo
            .update(
                sensor.id,
                &SensorPatch {
                    arduino_id: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(detached.arduino_id, None);

        let missing = repo.update(777, &SensorPatch::default()).await.unwrap_err();
        assert!(matches!(missing, DomainError::NotFound { entity: "Sensor", .. }));
    }
}
