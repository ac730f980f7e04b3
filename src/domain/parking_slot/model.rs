//! Parking slot domain entity

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::shared::errors::{DomainError, DomainResult};

/// Occupancy of a single parking space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Available,
    Occupied,
    Maintenance,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Maintenance => "maintenance",
        }
    }
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "occupied" => Ok(Self::Occupied),
            "maintenance" => Ok(Self::Maintenance),
            other => Err(DomainError::Validation(format!(
                "status must be 'available', 'occupied' or 'maintenance', got '{}'",
                other
            ))),
        }
    }
}

/// Parking space monitored by at most one sensor
#[derive(Debug, Clone)]
pub struct ParkingSlot {
    pub id: i32,
    pub location: String,
    /// `None` for rows that were never assigned a status
    pub status: Option<SlotStatus>,
    pub sensor_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewParkingSlot {
    pub location: String,
    pub status: SlotStatus,
    pub sensor_id: Option<i32>,
}

impl NewParkingSlot {
    pub fn validate(&self) -> DomainResult<()> {
        validate_location(&self.location)
    }
}

/// Manual slot update; setting `status` here overrides the sensor-derived value
/// until the next reconciliation.
#[derive(Debug, Clone, Default)]
pub struct ParkingSlotPatch {
    pub location: Option<String>,
    pub status: Option<SlotStatus>,
    pub sensor_id: Option<Option<i32>>,
}

impl ParkingSlotPatch {
    pub fn validate(&self) -> DomainResult<()> {
        match &self.location {
            Some(location) => validate_location(location),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParkingSlotFilter {
    pub location: Option<String>,
    pub status: Option<SlotStatus>,
    pub sensor_id: Option<i32>,
}

/// Slot counts per occupancy status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotStats {
    pub total: u64,
    pub available: u64,
    pub occupied: u64,
    pub maintenance: u64,
    /// Slots without any status
    pub unknown: u64,
}

impl SlotStats {
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = Option<SlotStatus>>,
    {
        statuses.into_iter().fold(Self::default(), |mut acc, status| {
            acc.total += 1;
            match status {
                Some(SlotStatus::Available) => acc.available += 1,
                Some(SlotStatus::Occupied) => acc.occupied += 1,
                Some(SlotStatus::Maintenance) => acc.maintenance += 1,
                None => acc.unknown += 1,
            }
            acc
        })
    }
}

fn validate_location(location: &str) -> DomainResult<()> {
    if location.trim().is_empty() {
        return Err(DomainError::Validation("location must not be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_count_every_bucket() {
        let stats = SlotStats::from_statuses(vec![
            Some(SlotStatus::Available),
            Some(SlotStatus::Available),
            Some(SlotStatus::Occupied),
            Some(SlotStatus::Maintenance),
            None,
        ]);
        assert_eq!(
            stats,
            SlotStats {
                total: 5,
                available: 2,
                occupied: 1,
                maintenance: 1,
                unknown: 1,
            }
        );
    }

    #[test]
    fn unknown_status_string_is_a_validation_error() {
        assert!(matches!(
            "reserved".parse::<SlotStatus>(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn blank_location_patch_is_rejected() {
        let patch = ParkingSlotPatch {
            location: Some(" ".into()),
            ..Default::default()
        };
        assert!(matches!(patch.validate(), Err(DomainError::Validation(_))));
        assert!(ParkingSlotPatch::default().validate().is_ok());
    }
}
