//! SeaORM implementation of ArduinoRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{debug, info};

use super::{conflict_on_unique, parse_column};
use crate::domain::arduino::{Arduino, ArduinoFilter, ArduinoRepository, NewArduino};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{arduino, sensor};
use crate::infrastructure::database::Store;

pub struct SeaOrmArduinoRepository {
    store: Store,
}

impl SeaOrmArduinoRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: arduino::Model) -> DomainResult<Arduino> {
    let status = parse_column("arduinos", m.id, &m.status)?;
    Ok(Arduino {
        id: m.id,
        ip_address: m.ip_address,
        location: m.location,
        status,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn duplicate_ip(ip: &str) -> String {
    format!("Arduino with ip_address {} already exists", ip)
}

async fn ensure_ip_free<C: ConnectionTrait>(
    db: &C,
    ip: &str,
    except_id: Option<i32>,
) -> DomainResult<()> {
    let mut query = arduino::Entity::find().filter(arduino::Column::IpAddress.eq(ip));
    if let Some(id) = except_id {
        query = query.filter(arduino::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(DomainError::Conflict(duplicate_ip(ip)));
    }
    Ok(())
}

// ── ArduinoRepository impl ──────────────────────────────────────

#[async_trait]
impl ArduinoRepository for SeaOrmArduinoRepository {
    async fn create(&self, new: NewArduino) -> DomainResult<Arduino> {
        new.validate()?;
        debug!(ip = %new.ip_address, "Creating arduino");

        let db = self.store.connection();
        self.store
            .run("arduinos.create", async move {
                ensure_ip_free(db, &new.ip_address, None).await?;
                let now = Utc::now();
                let ip = new.ip_address.clone();
                let model = arduino::ActiveModel {
                    ip_address: Set(new.ip_address),
                    location: Set(new.location),
                    status: Set(new.status.as_str().to_string()),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(db)
                .await
                .map_err(|e| conflict_on_unique(e, || duplicate_ip(&ip)))?;
                model_to_domain(model)
            })
            .await
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Arduino>> {
        let db = self.store.connection();
        self.store
            .run("arduinos.find_by_id", async move {
                arduino::Entity::find_by_id(id)
                    .one(db)
                    .await?
                    .map(model_to_domain)
                    .transpose()
            })
            .await
    }

    async fn find_all(&self, filter: &ArduinoFilter) -> DomainResult<Vec<Arduino>> {
        let mut query = arduino::Entity::find();
        if let Some(ip) = &filter.ip_address {
            query = query.filter(arduino::Column::IpAddress.eq(ip.as_str()));
        }
        if let Some(location) = &filter.location {
            query = query.filter(arduino::Column::Location.contains(location.as_str()));
        }
        if let Some(status) = filter.status {
            query = query.filter(arduino::Column::Status.eq(status.as_str()));
        }

        let db = self.store.connection();
        self.store
            .run("arduinos.find_all", async move {
                query
                    .order_by_asc(arduino::Column::Id)
                    .all(db)
                    .await?
                    .into_iter()
                    .map(model_to_domain)
                    .collect()
            })
            .await
    }

    async fn update(&self, a: &Arduino) -> DomainResult<Arduino> {
        debug!(arduino_id = a.id, status = %a.status, "Updating arduino");

        let db = self.store.connection();
        self.store
            .run("arduinos.update", async move {
                let existing = arduino::Entity::find_by_id(a.id)
                    .one(db)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Arduino", a.id))?;
                ensure_ip_free(db, &a.ip_address, Some(a.id)).await?;

                let mut active: arduino::ActiveModel = existing.into();
                active.ip_address = Set(a.ip_address.clone());
                active.location = Set(a.location.clone());
                active.status = Set(a.status.as_str().to_string());
                active.updated_at = Set(a.updated_at);
                let model = active
                    .update(db)
                    .await
                    .map_err(|e| conflict_on_unique(e, || duplicate_ip(&a.ip_address)))?;
                model_to_domain(model)
            })
            .await
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let db = self.store.connection();
        self.store
            .run("arduinos.delete", async move {
                let txn = db.begin().await?;

                if arduino::Entity::find_by_id(id).one(&txn).await?.is_none() {
                    return Err(DomainError::not_found("Arduino", id));
                }

                let detached = sensor::Entity::update_many()
                    .col_expr(sensor::Column::ArduinoId, Expr::value(Option::<i32>::None))
                    .col_expr(sensor::Column::UpdatedAt, Expr::value(Utc::now()))
                    .filter(sensor::Column::ArduinoId.eq(id))
                    .exec(&txn)
                    .await?;
                arduino::Entity::delete_by_id(id).exec(&txn).await?;
                txn.commit().await?;

                info!(
                    arduino_id = id,
                    detached_sensors = detached.rows_affected,
                    "Arduino deleted"
                );
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sensor::{DeviceStatus, NewSensor, SensorRepository};
    use crate::infrastructure::database::repositories::test_support::memory_store;
    use crate::infrastructure::database::repositories::SeaOrmSensorRepository;

    fn new_hub(ip: &str) -> NewArduino {
        NewArduino {
            ip_address: ip.into(),
            location: "Level 1".into(),
            status: DeviceStatus::Working,
        }
    }

    #[tokio::test]
    async fn duplicate_ip_is_a_conflict() {
        let repo = SeaOrmArduinoRepository::new(memory_store().await);
        repo.create(new_hub("10.0.0.5")).await.unwrap();

        let err = repo.create(new_hub("10.0.0.5")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_persists_status() {
        let repo = SeaOrmArduinoRepository::new(memory_store().await);
        let mut hub = repo.create(new_hub("10.0.0.6")).await.unwrap();
        hub.status = DeviceStatus::Maintenance;

        let saved = repo.update(&hub).await.unwrap();
        assert!(saved.in_maintenance());
        let reloaded = repo.find_by_id(hub.id).await.unwrap().unwrap();
        assert_eq!(reloaded.status, DeviceStatus::Maintenance);
    }

    #[tokio::test]
    async fn filter_by_status() {
        let repo = SeaOrmArduinoRepository::new(memory_store().await);
        repo.create(new_hub("10.0.0.7")).await.unwrap();
        let mut down = new_hub("10.0.0.8");
        down.status = DeviceStatus::Maintenance;
        repo.create(down).await.unwrap();

        let filter = ArduinoFilter {
            status: Some(DeviceStatus::Maintenance),
            ..Default::default()
        };
        let found = repo.find_all(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].ip_address, "10.0.0.8");
    }

    #[tokio::test]
    async fn delete_detaches_sensors() {
        let store = memory_store().await;
        let hubs = SeaOrmArduinoRepository::new(store.clone());
        let sensors = SeaOrmSensorRepository::new(store);

        let hub = hubs.create(new_hub("10.0.0.9")).await.unwrap();
        let sensor = sensors
            .create(NewSensor {
                sensor_type: "HC-SR04".into(),
                status: DeviceStatus::Working,
                sensor_range: 40,
                arduino_id: Some(hub.id),
            })
            .await
            .unwrap();

        hubs.delete(hub.id).await.unwrap();

        assert!(hubs.find_by_id(hub.id).await.unwrap().is_none());
        let kept = sensors.find_by_id(sensor.id).await.unwrap().unwrap();
        assert_eq!(kept.arduino_id, None);
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let repo = SeaOrmArduinoRepository::new(memory_store().await);
        let err = repo.delete(99).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
