//! Sensor reading → slot occupancy rules
//!
//! Rules are evaluated in priority order and the first match wins:
//!
//! 1. sensor in maintenance → slot in maintenance, whatever the distance
//! 2. working and `distance < threshold` → occupied
//! 3. working and `distance > threshold` → available
//! 4. working and `distance == threshold` → unchanged (maintenance if the
//!    slot has no status yet)
//!
//! The function is pure: it looks only at the slot's current status and the
//! reading it is given.

use super::model::SlotStatus;
use crate::domain::sensor::{DeviceStatus, SensorReading};

/// Distance in centimeters below which a vehicle is considered present.
/// A reading exactly at the threshold is inconclusive.
pub const OCCUPANCY_THRESHOLD_CM: i32 = 3;

/// Outcome of reconciling one slot against one reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    pub previous: Option<SlotStatus>,
    pub status: SlotStatus,
    /// `true` when `status` differs from `previous` and must be persisted
    pub changed: bool,
}

pub fn reconcile(
    current: Option<SlotStatus>,
    reading: &SensorReading,
    threshold_cm: i32,
) -> Reconciliation {
    let status = match reading.health() {
        DeviceStatus::Maintenance => SlotStatus::Maintenance,
        DeviceStatus::Working => {
            let distance = reading.distance_cm();
            if distance < threshold_cm {
                SlotStatus::Occupied
            } else if distance > threshold_cm {
                SlotStatus::Available
            } else {
                current.unwrap_or(SlotStatus::Maintenance)
            }
        }
    };

    Reconciliation {
        previous: current,
        status,
        changed: current != Some(status),
    }
}

// ── Tests ──────────────────────────────────────────────────────
