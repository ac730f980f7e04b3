//! Vehicle service DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::vehicle_service::{
    NewVehicleService, ServiceUsage, VehicleService, VehicleServicePatch,
};
use crate::interfaces::http::common::serde_helpers::double_option;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VehicleServiceDto {
    pub id: i32,
    pub vehicle_type: String,
    pub price: f64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VehicleService> for VehicleServiceDto {
    fn from(s: VehicleService) -> Self {
        Self {
            id: s.id,
            vehicle_type: s.vehicle_type,
            price: s.price,
            description: s.description,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVehicleServiceRequest {
    #[validate(length(min = 1, max = 50))]
    #[schema(example = "car")]
    pub vehicle_type: String,
    #[validate(range(min = 0.0))]
    #[schema(example = 50.0)]
    pub price: f64,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

impl From<CreateVehicleServiceRequest> for NewVehicleService {
    fn from(r: CreateVehicleServiceRequest) -> Self {
        Self {
            vehicle_type: r.vehicle_type,
            price: r.price,
            description: r.description,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateVehicleServiceRequest {
    #[validate(length(min = 1, max = 50))]
    pub vehicle_type: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    /// `null` clears the description
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

impl From<UpdateVehicleServiceRequest> for VehicleServicePatch {
    fn from(r: UpdateVehicleServiceRequest) -> Self {
        Self {
            vehicle_type: r.vehicle_type,
            price: r.price,
            description: r.description,
        }
    }
}

/// Users enrolled per service
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceUsageDto {
    pub service_id: i32,
    pub vehicle_type: String,
    pub user_count: u64,
}

impl From<ServiceUsage> for ServiceUsageDto {
    fn from(u: ServiceUsage) -> Self {
        Self {
            service_id: u.service_id,
            vehicle_type: u.vehicle_type,
            user_count: u.user_count,
        }
    }
}
