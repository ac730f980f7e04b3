//! SeaORM implementation of VehicleServiceRepository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::conflict_on_unique;
use crate::domain::vehicle_service::{
    NewVehicleService, ServiceUsage, VehicleService, VehicleServiceRepository,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{user, vehicle_service};
use crate::infrastructure::database::Store;

pub struct SeaOrmVehicleServiceRepository {
    store: Store,
}

impl SeaOrmVehicleServiceRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

fn model_to_domain(m: vehicle_service::Model) -> VehicleService {
    VehicleService {
        id: m.id,
        vehicle_type: m.vehicle_type,
        price: m.price,
        description: m.description,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn duplicate_type(vehicle_type: &str) -> String {
    format!("Service for vehicle type '{}' already exists", vehicle_type)
}

async fn ensure_type_free<C: ConnectionTrait>(
    db: &C,
    vehicle_type: &str,
    except_id: Option<i32>,
) -> DomainResult<()> {
    let mut query =
        vehicle_service::Entity::find().filter(vehicle_service::Column::VehicleType.eq(vehicle_type));
    if let Some(id) = except_id {
        query = query.filter(vehicle_service::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(DomainError::Conflict(duplicate_type(vehicle_type)));
    }
    Ok(())
}

#[async_trait]
impl VehicleServiceRepository for SeaOrmVehicleServiceRepository {
    async fn create(&self, new: NewVehicleService) -> DomainResult<VehicleService> {
        let new = new.normalize()?;

        let db = self.store.connection();
        self.store
            .run("services.create", async move {
                ensure_type_free(db, &new.vehicle_type, None).await?;
                let now = Utc::now();
                let vehicle_type = new.vehicle_type.clone();
                let model = vehicle_service::ActiveModel {
                    vehicle_type: Set(new.vehicle_type),
                    price: Set(new.price),
                    description: Set(new.description),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(db)
                .await
                .map_err(|e| conflict_on_unique(e, || duplicate_type(&vehicle_type)))?;
                Ok(model_to_domain(model))
            })
            .await
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<VehicleService>> {
        let db = self.store.connection();
        self.store
            .run("services.find_by_id", async move {
                Ok(vehicle_service::Entity::find_by_id(id)
                    .one(db)
                    .await?
                    .map(model_to_domain))
            })
            .await
    }

    async fn find_all(&self) -> DomainResult<Vec<VehicleService>> {
        let db = self.store.connection();
        self.store
            .run("services.find_all", async move {
                Ok(vehicle_service::Entity::find()
                    .order_by_asc(vehicle_service::Column::Id)
                    .all(db)
                    .await?
                    .into_iter()
                    .map(model_to_domain)
                    .collect())
            })
            .await
    }

    async fn update(&self, service: &VehicleService) -> DomainResult<VehicleService> {
        let db = self.store.connection();
        self.store
            .run("services.update", async move {
                let existing = vehicle_service::Entity::find_by_id(service.id)
                    .one(db)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Service", service.id))?;
                ensure_type_free(db, &service.vehicle_type, Some(service.id)).await?;

                let mut active: vehicle_service::ActiveModel = existing.into();
                active.vehicle_type = Set(service.vehicle_type.clone());
                active.price = Set(service.price);
                active.description = Set(service.description.clone());
                active.updated_at = Set(service.updated_at);
                let model = active
                    .update(db)
                    .await
                    .map_err(|e| conflict_on_unique(e, || duplicate_type(&service.vehicle_type)))?;
                Ok(model_to_domain(model))
            })
            .await
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let db = self.store.connection();
        self.store
            .run("services.delete", async move {
                let enrolled = user::Entity::find()
                    .filter(user::Column::ServiceId.eq(id))
                    .count(db)
                    .await?;
                if enrolled > 0 {
                    return Err(DomainError::Conflict(format!(
                        "Service {} is used by {} user(s)",
                        id, enrolled
                    )));
                }

                let result = vehicle_service::Entity::delete_by_id(id).exec(db).await?;
                if result.rows_affected == 0 {
                    return Err(DomainError::not_found("Service", id));
                }
                Ok(())
            })
            .await
    }

    async fn usage(&self) -> DomainResult<Vec<ServiceUsage>> {
        let db = self.store.connection();
        self.store
            .run("services.usage", async move {
                let services = vehicle_service::Entity::find()
                    .order_by_asc(vehicle_service::Column::Id)
                    .all(db)
                    .await?;
                let enrolled: Vec<Option<i32>> = user::Entity::find()
                    .select_only()
                    .column(user::Column::ServiceId)
                    .into_tuple()
                    .all(db)
                    .await?;

                let mut counts: HashMap<i32, u64> = HashMap::new();
                for service_id in enrolled.into_iter().flatten() {
                    *counts.entry(service_id).or_default() += 1;
                }

                Ok(services
                    .into_iter()
                    .map(|s| ServiceUsage {
                        service_id: s.id,
                        user_count: counts.get(&s.id).copied().unwrap_or(0),
                        vehicle_type: s.vehicle_type,
                    })
                    .collect())
            })
            .await
    }
}
