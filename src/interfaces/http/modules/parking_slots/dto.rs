//! Parking slot DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::parking_slot::{
    NewParkingSlot, ParkingSlot, ParkingSlotFilter, ParkingSlotPatch, Reconciliation, SlotStats,
    SlotStatus,
};
use crate::domain::sensor::SensorReading;
use crate::domain::DomainResult;
use crate::interfaces::http::common::serde_helpers::double_option;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParkingSlotDto {
    pub id: i32,
    pub location: String,
    /// `available`, `occupied`, `maintenance`, or `null` if never set
    pub status: Option<String>,
    pub sensor_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ParkingSlot> for ParkingSlotDto {
    fn from(s: ParkingSlot) -> Self {
        Self {
            id: s.id,
            location: s.location,
            status: s.status.map(|st| st.to_string()),
            sensor_id: s.sensor_id,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateParkingSlotRequest {
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "Level 1 - A3")]
    pub location: String,
    /// Defaults to `available`
    pub status: Option<String>,
    #[validate(range(min = 1))]
    pub sensor_id: Option<i32>,
}

impl CreateParkingSlotRequest {
    pub fn into_new(self) -> DomainResult<NewParkingSlot> {
        let status = match self.status {
            Some(s) => s.parse()?,
            None => SlotStatus::Available,
        };
        Ok(NewParkingSlot {
            location: self.location,
            status,
            sensor_id: self.sensor_id,
        })
    }
}

/// Manual update; a supplied `status` overrides the sensor-derived one
/// until the next reconciliation.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateParkingSlotRequest {
    #[validate(length(min = 1, max = 255))]
    pub location: Option<String>,
    pub status: Option<String>,
    /// `null` unlinks the monitoring sensor
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub sensor_id: Option<Option<i32>>,
}

impl UpdateParkingSlotRequest {
    pub fn into_patch(self) -> DomainResult<ParkingSlotPatch> {
        Ok(ParkingSlotPatch {
            location: self.location,
            status: self.status.map(|s| s.parse()).transpose()?,
            sensor_id: self.sensor_id,
        })
    }
}

/// Reading reported for one slot's sensor
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SlotSensorUpdateRequest {
    /// `working` or `maintenance`
    #[schema(example = "working")]
    pub sensor_status: String,
    /// Distance in centimeters, 0 to 1000
    #[validate(range(min = 0, max = 1000))]
    #[schema(example = 2)]
    pub sensor_range: i32,
}

impl SlotSensorUpdateRequest {
    pub fn into_reading(self) -> DomainResult<SensorReading> {
        SensorReading::new(self.sensor_status.parse()?, self.sensor_range)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SlotReconciliationDto {
    pub slot: ParkingSlotDto,
    pub previous: Option<String>,
    pub status: String,
    /// `false` when the slot already had this status and nothing was written
    pub changed: bool,
}

impl SlotReconciliationDto {
    pub fn new(slot: ParkingSlot, outcome: Reconciliation) -> Self {
        Self {
            slot: slot.into(),
            previous: outcome.previous.map(|s| s.to_string()),
            status: outcome.status.to_string(),
            changed: outcome.changed,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListParkingSlotsParams {
    /// Partial location match
    pub location: Option<String>,
    pub status: Option<String>,
    pub sensor_id: Option<i32>,
}

impl ListParkingSlotsParams {
    pub fn into_filter(self) -> DomainResult<ParkingSlotFilter> {
        Ok(ParkingSlotFilter {
            location: self.location,
            status: self.status.map(|s| s.parse()).transpose()?,
            sensor_id: self.sensor_id,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SlotStatsDto {
    pub total: u64,
    pub available: u64,
    pub occupied: u64,
    pub maintenance: u64,
    /// Slots without any status
    pub unknown: u64,
}

impl From<SlotStats> for SlotStatsDto {
    fn from(s: SlotStats) -> Self {
        Self {
            total: s.total,
            available: s.available,
            occupied: s.occupied,
            maintenance: s.maintenance,
            unknown: s.unknown,
        }
    }
}
