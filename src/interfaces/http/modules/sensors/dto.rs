//! Sensor DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::SlotOutcome;
use crate::domain::sensor::{DeviceStatus, NewSensor, Sensor, SensorFilter, SensorPatch};
use crate::domain::DomainResult;
use crate::interfaces::http::common::serde_helpers::double_option;
use crate::interfaces::http::common::ApiError;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SensorDto {
    pub id: i32,
    pub sensor_type: String,
    /// `working` or `maintenance`
    pub status: String,
    /// Last distance reading in centimeters
    pub sensor_range: i32,
    pub arduino_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Sensor> for SensorDto {
    fn from(s: Sensor) -> Self {
        Self {
            id: s.id,
            sensor_type: s.sensor_type,
            status: s.status.to_string(),
            sensor_range: s.sensor_range,
            arduino_id: s.arduino_id,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSensorRequest {
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "HC-SR04")]
    pub sensor_type: String,
    /// Defaults to `working`
    pub status: Option<String>,
    #[validate(range(min = 0, max = 1000))]
    #[serde(default)]
    pub sensor_range: i32,
    #[validate(range(min = 1))]
    pub arduino_id: Option<i32>,
}

impl CreateSensorRequest {
    pub fn into_new(self) -> DomainResult<NewSensor> {
        let status = match self.status {
            Some(s) => s.parse()?,
            None => DeviceStatus::Working,
        };
        Ok(NewSensor {
            sensor_type: self.sensor_type,
            status,
            sensor_range: self.sensor_range,
            arduino_id: self.arduino_id,
        })
    }
}

/// Partial sensor update. Supplying `status` or `sensor_range` reconciles
/// every slot the sensor monitors.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSensorRequest {
    #[validate(length(min = 1, max = 100))]
    pub sensor_type: Option<String>,
    pub status: Option<String>,
    #[validate(range(min = 0, max = 1000))]
    pub sensor_range: Option<i32>,
    /// `null` detaches the sensor from its Arduino
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub arduino_id: Option<Option<i32>>,
}

impl UpdateSensorRequest {
    pub fn into_patch(self) -> DomainResult<SensorPatch> {
        Ok(SensorPatch {
            sensor_type: self.sensor_type,
            status: self.status.map(|s| s.parse()).transpose()?,
            sensor_range: self.sensor_range,
            arduino_id: self.arduino_id,
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListSensorsParams {
    pub arduino_id: Option<i32>,
    pub status: Option<String>,
}

impl ListSensorsParams {
    pub fn into_filter(self) -> DomainResult<SensorFilter> {
        Ok(SensorFilter {
            arduino_id: self.arduino_id,
            status: self.status.map(|s| s.parse()).transpose()?,
        })
    }
}

/// Per-slot result of a sensor cascade
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SlotOutcomeDto {
    pub slot_id: i32,
    pub success: bool,
    pub previous: Option<String>,
    pub status: Option<String>,
    pub changed: Option<bool>,
    pub error: Option<String>,
}

impl From<SlotOutcome> for SlotOutcomeDto {
    fn from(o: SlotOutcome) -> Self {
        match o.result {
            Ok(r) => Self {
                slot_id: o.slot_id,
                success: true,
                previous: r.previous.map(|s| s.to_string()),
                status: Some(r.status.to_string()),
                changed: Some(r.changed),
                error: None,
            },
            Err(e) => Self {
                slot_id: o.slot_id,
                success: false,
                previous: None,
                status: None,
                changed: None,
                error: Some(ApiError(e).public_message()),
            },
        }
    }
}
