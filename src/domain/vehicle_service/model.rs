//! Parking service offered per vehicle type

use chrono::{DateTime, Utc};

use crate::shared::errors::{DomainError, DomainResult};

#[derive(Debug, Clone)]
pub struct VehicleService {
    pub id: i32,
    /// Unique label such as "car" or "motorcycle", stored lower-case
    pub vehicle_type: String,
    pub price: f64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VehicleService {
    pub fn apply(&mut self, patch: VehicleServicePatch) -> DomainResult<()> {
        let vehicle_type = patch
            .vehicle_type
            .as_deref()
            .map(normalize_vehicle_type)
            .transpose()?;
        if let Some(price) = patch.price {
            validate_price(price)?;
        }

        if let Some(vehicle_type) = vehicle_type {
            self.vehicle_type = vehicle_type;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct NewVehicleService {
    pub vehicle_type: String,
    pub price: f64,
    pub description: Option<String>,
}

impl NewVehicleService {
    pub fn normalize(mut self) -> DomainResult<Self> {
        self.vehicle_type = normalize_vehicle_type(&self.vehicle_type)?;
        validate_price(self.price)?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct VehicleServicePatch {
    pub vehicle_type: Option<String>,
    pub price: Option<f64>,
    pub description: Option<Option<String>>,
}

/// How many users are enrolled in one service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUsage {
    pub service_id: i32,
    pub vehicle_type: String,
    pub user_count: u64,
}

pub fn normalize_vehicle_type(value: &str) -> DomainResult<String> {
    let normalized = value.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(DomainError::Validation("vehicle_type must not be empty".into()));
    }
    Ok(normalized)
}

fn validate_price(price: f64) -> DomainResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(DomainError::Validation(format!(
            "price must be a non-negative number, got {}",
            price
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vehicle_type_is_lowercased() {
        let svc = NewVehicleService {
            vehicle_type: "  Motorcycle ".into(),
            price: 20.0,
            description: None,
        }
        .normalize()
        .unwrap();
        assert_eq!(svc.vehicle_type, "motorcycle");
    }

    #[test]
    fn negative_price_is_rejected() {
        let svc = NewVehicleService {
            vehicle_type: "car".into(),
            price: -1.0,
            description: None,
        };
        assert!(svc.normalize().is_err());
    }
}
