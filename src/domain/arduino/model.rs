//! Arduino hub domain entity

use chrono::{DateTime, Utc};

use crate::domain::sensor::DeviceStatus;
use crate::shared::errors::{DomainError, DomainResult};

/// Networked microcontroller hosting one or more distance sensors
#[derive(Debug, Clone)]
pub struct Arduino {
    pub id: i32,
    /// Network address, unique across all hubs
    pub ip_address: String,
    pub location: String,
    pub status: DeviceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Arduino {
    pub fn apply(&mut self, patch: ArduinoPatch) -> DomainResult<()> {
        if let Some(ip) = &patch.ip_address {
            validate_ip(ip)?;
        }
        if let Some(location) = &patch.location {
            validate_location(location)?;
        }

        if let Some(ip) = patch.ip_address {
            self.ip_address = ip;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn in_maintenance(&self) -> bool {
        self.status == DeviceStatus::Maintenance
    }
}

#[derive(Debug, Clone)]
pub struct NewArduino {
    pub ip_address: String,
    pub location: String,
    pub status: DeviceStatus,
}

impl NewArduino {
    pub fn validate(&self) -> DomainResult<()> {
        validate_ip(&self.ip_address)?;
        validate_location(&self.location)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ArduinoPatch {
    pub ip_address: Option<String>,
    pub location: Option<String>,
    pub status: Option<DeviceStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct ArduinoFilter {
    pub ip_address: Option<String>,
    pub location: Option<String>,
    pub status: Option<DeviceStatus>,
}

fn validate_ip(ip: &str) -> DomainResult<()> {
    ip.parse::<std::net::IpAddr>()
        .map(|_| ())
        .map_err(|_| DomainError::Validation(format!("'{}' is not a valid IP address", ip)))
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

    fn hub() -> Arduino {
        Arduino {
            id: 7,
            ip_address: "192.168.1.20".into(),
            location: "Level 1".into(),
            status: DeviceStatus::Working,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn new_arduino_requires_ip_address() {
        let new = NewArduino {
            ip_address: "not-an-ip".into(),
            location: "Level 1".into(),
            status: DeviceStatus::Working,
        };
        assert!(matches!(new.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn ipv6_is_accepted() {
        let new = NewArduino {
            ip_address: "fe80::1".into(),
            location: "Gate B".into(),
            status: DeviceStatus::Working,
        };
        assert!(new.validate().is_ok());
    }

    #[test]
    fn patch_to_maintenance() {
        let mut a = hub();
        a.apply(ArduinoPatch {
            status: Some(DeviceStatus::Maintenance),
            ..Default::default()
        })
        .unwrap();
        assert!(a.in_maintenance());
        assert_eq!(a.location, "Level 1");
    }

    #[test]
    fn blank_location_is_rejected() {
        let mut a = hub();
        let err = a.apply(ArduinoPatch {
            location: Some("   ".into()),
            ..Default::default()
        });
        assert!(err.is_err());
        assert_eq!(a.location, "Level 1");
    }
}
