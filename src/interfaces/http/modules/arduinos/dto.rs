//! Arduino DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::arduino::{Arduino, ArduinoFilter, ArduinoPatch, NewArduino};
use crate::domain::sensor::DeviceStatus;
use crate::domain::DomainResult;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ArduinoDto {
    pub id: i32,
    pub ip_address: String,
    pub location: String,
    /// `working` or `maintenance`
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Arduino> for ArduinoDto {
    fn from(a: Arduino) -> Self {
        Self {
            id: a.id,
            ip_address: a.ip_address,
            location: a.location,
            status: a.status.to_string(),
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateArduinoRequest {
    #[validate(length(min = 1, max = 45))]
    #[schema(example = "192.168.1.20")]
    pub ip_address: String,
    #[validate(length(min = 1, max = 255))]
    pub location: String,
    /// Defaults to `working`
    pub status: Option<String>,
}

impl CreateArduinoRequest {
    pub fn into_new(self) -> DomainResult<NewArduino> {
        let status = match self.status {
            Some(s) => s.parse()?,
            None => DeviceStatus::Working,
        };
        Ok(NewArduino {
            ip_address: self.ip_address.trim().to_string(),
            location: self.location,
            status,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateArduinoRequest {
    #[validate(length(min = 1, max = 45))]
    pub ip_address: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub location: Option<String>,
    /// Setting `maintenance` forces every attached sensor into maintenance
    pub status: Option<String>,
}

impl UpdateArduinoRequest {
    pub fn into_patch(self) -> DomainResult<ArduinoPatch> {
        Ok(ArduinoPatch {
            ip_address: self.ip_address.map(|ip| ip.trim().to_string()),
            location: self.location,
            status: self.status.map(|s| s.parse()).transpose()?,
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListArduinosParams {
    /// Exact IP address
    pub ip_address: Option<String>,
    /// Partial location match
    pub location: Option<String>,
    pub status: Option<String>,
}

impl ListArduinosParams {
    pub fn into_filter(self) -> DomainResult<ArduinoFilter> {
        Ok(ArduinoFilter {
            ip_address: self.ip_address,
            location: self.location,
            status: self.status.map(|s| s.parse()).transpose()?,
        })
    }
}
