//! Sensor domain entity and the reading it reports

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::shared::errors::{DomainError, DomainResult};

/// Largest distance a sensor may report, in centimeters.
pub const MAX_DISTANCE_CM: i32 = 1000;

/// Health of an Arduino hub or one of its sensors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    Working,
    Maintenance,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Working => "working",
            Self::Maintenance => "maintenance",
        }
    }
}

impl Default for DeviceStatus {
    fn default() -> Self {
        Self::Working
    }
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "working" => Ok(Self::Working),
            "maintenance" => Ok(Self::Maintenance),
            other => Err(DomainError::Validation(format!(
                "status must be 'working' or 'maintenance', got '{}'",
                other
            ))),
        }
    }
}

/// One telemetry sample: sensor health plus measured distance.
///
/// Construction validates the distance, so a `SensorReading` in hand is
/// always within `[0, MAX_DISTANCE_CM]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorReading {
    health: DeviceStatus,
    distance_cm: i32,
}

impl SensorReading {
    pub fn new(health: DeviceStatus, distance_cm: i32) -> DomainResult<Self> {
        validate_distance(distance_cm)?;
        Ok(Self {
            health,
            distance_cm,
        })
    }

    pub fn health(&self) -> DeviceStatus {
        self.health
    }

    pub fn distance_cm(&self) -> i32 {
        self.distance_cm
    }
}

pub fn validate_distance(distance_cm: i32) -> DomainResult<()> {
    if (0..=MAX_DISTANCE_CM).contains(&distance_cm) {
        Ok(())
    } else {
        Err(DomainError::Validation(format!(
            "sensor_range must be between 0 and {} cm, got {}",
            MAX_DISTANCE_CM, distance_cm
        )))
    }
}

/// Distance sensor wired to an Arduino hub
#[derive(Debug, Clone)]
pub struct Sensor {
    pub id: i32,
    /// Free-form hardware label, e.g. "HC-SR04"
    pub sensor_type: String,
    pub status: DeviceStatus,
    /// Last distance reading in centimeters
    pub sensor_range: i32,
    pub arduino_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sensor {
    /// The sensor's stored health and distance as a reading.
    pub fn reading(&self) -> DomainResult<SensorReading> {
        SensorReading::new(self.status, self.sensor_range)
    }
}

#[derive(Debug, Clone)]
pub struct NewSensor {
    pub sensor_type: String,
    pub status: DeviceStatus,
    pub sensor_range: i32,
    pub arduino_id: Option<i32>,
}

impl NewSensor {
    pub fn validate(&self) -> DomainResult<()> {
        if self.sensor_type.trim().is_empty() {
            return Err(DomainError::Validation("sensor_type must not be empty".into()));
        }
        validate_distance(self.sensor_range)
    }
}

/// Partial sensor update; `arduino_id: Some(None)` detaches the sensor.
#[derive(Debug, Clone, Default)]
pub struct SensorPatch {
    pub sensor_type: Option<String>,
    pub status: Option<DeviceStatus>,
    pub sensor_range: Option<i32>,
    pub arduino_id: Option<Option<i32>>,
}

impl SensorPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(range) = self.sensor_range {
            validate_distance(range)?;
        }
        if let Some(sensor_type) = &self.sensor_type {
            if sensor_type.trim().is_empty() {
                return Err(DomainError::Validation("sensor_type must not be empty".into()));
            }
        }
        Ok(())
    }

    /// Health or distance supplied, so the monitored slots need reconciling.
    pub fn touches_reading(&self) -> bool {
        self.status.is_some() || self.sensor_range.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SensorFilter {
    pub arduino_id: Option<i32>,
    pub status: Option<DeviceStatus>,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sensor() -> Sensor {
        Sensor {
            id: 1,
            sensor_type: "HC-SR04".into(),
            status: DeviceStatus::Working,
            sensor_range: 120,
            arduino_id: Some(1),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn reading_accepts_bounds() {
        assert!(SensorReading::new(DeviceStatus::Working, 0).is_ok());
        assert!(SensorReading::new(DeviceStatus::Working, MAX_DISTANCE_CM).is_ok());
    }

    #[test]
    fn reading_rejects_out_of_range_distance() {
        assert!(matches!(
            SensorReading::new(DeviceStatus::Working, -1),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            SensorReading::new(DeviceStatus::Maintenance, 1001),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn status_parsing_is_case_insensitive() {
        assert_eq!("Maintenance".parse::<DeviceStatus>().unwrap(), DeviceStatus::Maintenance);
        assert_eq!(" working ".parse::<DeviceStatus>().unwrap(), DeviceStatus::Working);
        assert!("broken".parse::<DeviceStatus>().is_err());
    }

    #[test]
    fn distance_patch_requests_reconciliation() {
        let patch = SensorPatch {
            sensor_range: Some(2),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
        assert!(patch.touches_reading());
    }

    #[test]
    fn label_patch_does_not() {
        let patch = SensorPatch {
            sensor_type: Some("VL53L0X".into()),
            ..Default::default()
        };
        assert!(!patch.touches_reading());
    }

    #[test]
    fn out_of_range_or_blank_patch_is_rejected() {
        let far = SensorPatch {
            status: Some(DeviceStatus::Maintenance),
            sensor_range: Some(5000),
            ..Default::default()
        };
        assert!(matches!(far.validate(), Err(DomainError::Validation(_))));

        let blank = SensorPatch {
            sensor_type: Some("  ".into()),
            ..Default::default()
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn stored_reading_is_revalidated() {
        let mut sensor = sample_sensor();
        assert_eq!(sensor.reading().unwrap().distance_cm(), 120);
        sensor.sensor_range = -4;
        assert!(sensor.reading().is_err());
    }
}
