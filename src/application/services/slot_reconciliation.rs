//! Slot reconciliation service
//!
//! Applies [`reconcile`] to stored slots and persists the result. A slot is
//! written only when its status actually changes, so replaying a reading is
//! free of side effects.

use std::sync::Arc;

use chrono::Utc;
use futures_util::future::join_all;
use tracing::{debug, info, warn};

use crate::application::events::{Event, SharedEventBus, SlotStatusChangedEvent};
use crate::domain::parking_slot::{reconcile, ParkingSlot, Reconciliation};
use crate::domain::sensor::SensorReading;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// Result of reconciling one slot within a sensor cascade
#[derive(Debug)]
pub struct SlotOutcome {
    pub slot_id: i32,
    pub result: DomainResult<Reconciliation>,
}

pub struct SlotReconciliationService {
    repos: Arc<dyn RepositoryProvider>,
    threshold_cm: i32,
    event_bus: Option<SharedEventBus>,
}

impl SlotReconciliationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, threshold_cm: i32) -> Self {
        Self {
            repos,
            threshold_cm,
            event_bus: None,
        }
    }

    /// Publish `SlotStatusChanged` for every persisted change.
    pub fn with_event_bus(mut self, event_bus: SharedEventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn threshold_cm(&self) -> i32 {
        self.threshold_cm
    }

    /// Reconcile one slot against one reading, writing only on change.
    pub async fn reconcile_slot(
        &self,
        slot: &ParkingSlot,
        reading: &SensorReading,
    ) -> DomainResult<Reconciliation> {
        let outcome = reconcile(slot.status, reading, self.threshold_cm);

        if !outcome.changed {
            debug!(slot_id = slot.id, status = %outcome.status, "Slot already reconciled");
            metrics::counter!("slot_reconciliations_total", "outcome" => "unchanged").increment(1);
            return Ok(outcome);
        }

        if let Err(e) = self
            .repos
            .parking_slots()
            .update_status(slot.id, outcome.status)
            .await
        {
            metrics::counter!("slot_reconciliations_total", "outcome" => "failed").increment(1);
            return Err(e);
        }
        metrics::counter!("slot_reconciliations_total", "outcome" => "changed").increment(1);

        info!(
            slot_id = slot.id,
            sensor_id = ?slot.sensor_id,
            previous = ?outcome.previous.map(|s| s.as_str()),
            status = %outcome.status,
            "Slot status reconciled"
        );

        if let Some(bus) = &self.event_bus {
            bus.publish(Event::SlotStatusChanged(SlotStatusChangedEvent {
                slot_id: slot.id,
                sensor_id: slot.sensor_id,
                previous: outcome.previous.map(|s| s.as_str().to_string()),
                status: outcome.status.as_str().to_string(),
                timestamp: Utc::now(),
            }));
        }

        Ok(outcome)
    }

    /// Load a slot and reconcile it. Returns the slot as stored afterwards.
    pub async fn reconcile_slot_by_id(
        &self,
        slot_id: i32,
        reading: &SensorReading,
    ) -> DomainResult<(ParkingSlot, Reconciliation)> {
        let mut slot = self
            .repos
            .parking_slots()
            .find_by_id(slot_id)
            .await?
            .ok_or_else(|| DomainError::not_found("ParkingSlot", slot_id))?;

        let outcome = self.reconcile_slot(&slot, reading).await?;
        if outcome.changed {
            slot.status = Some(outcome.status);
            slot.updated_at = Utc::now();
        }
        Ok((slot, outcome))
    }

    /// Reconcile every slot monitored by `sensor_id`.
    ///
    /// Slots are processed concurrently and independently; one failing slot
    /// does not stop the others. Only failing to list the slots is an error.
    pub async fn reconcile_sensor_cascade(
        &self,
        sensor_id: i32,
        reading: &SensorReading,
    ) -> DomainResult<Vec<SlotOutcome>> {
        let slots = self.repos.parking_slots().find_by_sensor(sensor_id).await?;

        let outcomes: Vec<SlotOutcome> = join_all(slots.iter().map(|slot| async move {
            SlotOutcome {
                slot_id: slot.id,
                result: self.reconcile_slot(slot, reading).await,
            }
        }))
        .await;

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        for outcome in &outcomes {
            if let Err(e) = &outcome.result {
                warn!(sensor_id, slot_id = outcome.slot_id, error = %e, "Slot reconciliation failed");
            }
        }
        debug!(
            sensor_id,
            health = %reading.health(),
            distance_cm = reading.distance_cm(),
            slots = outcomes.len(),
            failed,
            "Sensor cascade finished"
        );

        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing::FlakyRepos;
    use crate::domain::parking_slot::{NewParkingSlot, SlotStatus, OCCUPANCY_THRESHOLD_CM};
    use crate::domain::sensor::{DeviceStatus, NewSensor};
    use crate::infrastructure::database::repositories::test_support::memory_store;

    async fn wired(repos: &FlakyRepos, statuses: &[SlotStatus]) -> (i32, Vec<i32>) {
        let sensor = repos
            .sensors()
            .create(NewSensor {
                sensor_type: "HC-SR04".into(),
                status: DeviceStatus::Working,
                sensor_range: 100,
                arduino_id: None,
            })
            .await
            .unwrap();
        let mut ids = Vec::new();
        for (n, status) in statuses.iter().enumerate() {
            let slot = repos
                .parking_slots()
                .create(NewParkingSlot {
                    location: format!("S{}", n + 1),
                    status: *status,
                    sensor_id: Some(sensor.id),
                })
                .await
                .unwrap();
            ids.push(slot.id);
        }
        (sensor.id, ids)
    }

    fn working(distance: i32) -> SensorReading {
        SensorReading::new(DeviceStatus::Working, distance).unwrap()
    }

    async fn status_of(repos: &FlakyRepos, id: i32) -> Option<SlotStatus> {
        repos
            .parking_slots()
            .find_by_id(id)
            .await
            .unwrap()
            .unwrap()
            .status
    }

    #[tokio::test]
    async fn cascade_reports_every_slot() {
        let repos = Arc::new(FlakyRepos::new(memory_store().await));
        let (sensor_id, ids) = wired(&repos, &[SlotStatus::Available, SlotStatus::Occupied]).await;
        let service = SlotReconciliationService::new(repos.clone(), OCCUPANCY_THRESHOLD_CM);

        let outcomes = service
            .reconcile_sensor_cascade(sensor_id, &working(1))
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 2);
        let s1 = outcomes.iter().find(|o| o.slot_id == ids[0]).unwrap();
        let s2 = outcomes.iter().find(|o| o.slot_id == ids[1]).unwrap();
        let r1 = s1.result.as_ref().unwrap();
        let r2 = s2.result.as_ref().unwrap();
        assert_eq!((r1.status, r1.changed), (SlotStatus::Occupied, true));
        assert_eq!((r2.status, r2.changed), (SlotStatus::Occupied, false));
        assert_eq!(repos.slot_writes(), 1);
    }

    #[tokio::test]
    async fn failing_slot_does_not_stop_the_rest() {
        let repos = Arc::new(FlakyRepos::new(memory_store().await));
        let (sensor_id, ids) = wired(&repos, &[SlotStatus::Available, SlotStatus::Available]).await;
        repos.fail_slot(ids[0]);
        let service = SlotReconciliationService::new(repos.clone(), OCCUPANCY_THRESHOLD_CM);

        let outcomes = service
            .reconcile_sensor_cascade(sensor_id, &working(1))
            .await
            .unwrap();

        let s1 = outcomes.iter().find(|o| o.slot_id == ids[0]).unwrap();
        let s2 = outcomes.iter().find(|o| o.slot_id == ids[1]).unwrap();
        assert!(s1.result.is_err());
        assert!(s2.result.as_ref().unwrap().changed);
        assert_eq!(status_of(&repos, ids[0]).await, Some(SlotStatus::Available));
        assert_eq!(status_of(&repos, ids[1]).await, Some(SlotStatus::Occupied));
    }

    #[tokio::test]
    async fn repeated_reading_writes_once() {
        let repos = Arc::new(FlakyRepos::new(memory_store().await));
        let (_, ids) = wired(&repos, &[SlotStatus::Occupied]).await;
        let service = SlotReconciliationService::new(repos.clone(), OCCUPANCY_THRESHOLD_CM);

        let (slot, first) = service.reconcile_slot_by_id(ids[0], &working(250)).await.unwrap();
        assert!(first.changed);
        assert_eq!(slot.status, Some(SlotStatus::Available));

        let (_, second) = service.reconcile_slot_by_id(ids[0], &working(250)).await.unwrap();
        assert!(!second.changed);
        assert_eq!(repos.slot_writes(), 1);
    }

    #[tokio::test]
    async fn threshold_reading_leaves_slot_alone() {
        let repos = Arc::new(FlakyRepos::new(memory_store().await));
        let (_, ids) = wired(&repos, &[SlotStatus::Occupied]).await;
        let service = SlotReconciliationService::new(repos.clone(), OCCUPANCY_THRESHOLD_CM);

        let (_, outcome) = service
            .reconcile_slot_by_id(ids[0], &working(OCCUPANCY_THRESHOLD_CM))
            .await
            .unwrap();
        assert_eq!(outcome.status, SlotStatus::Occupied);
        assert!(!outcome.changed);
        assert_eq!(repos.slot_writes(), 0);
    }

    #[tokio::test]
    async fn maintenance_reading_wins_over_distance() {
        let repos = Arc::new(FlakyRepos::new(memory_store().await));
        let (sensor_id, ids) = wired(&repos, &[SlotStatus::Available]).await;
        let service = SlotReconciliationService::new(repos.clone(), OCCUPANCY_THRESHOLD_CM);

        let reading = SensorReading::new(DeviceStatus::Maintenance, 0).unwrap();
        service
            .reconcile_sensor_cascade(sensor_id, &reading)
            .await
            .unwrap();
        assert_eq!(status_of(&repos, ids[0]).await, Some(SlotStatus::Maintenance));
    }

    #[tokio::test]
    async fn missing_slot_is_not_found() {
        let repos = Arc::new(FlakyRepos::new(memory_store().await));
        let service = SlotReconciliationService::new(repos, OCCUPANCY_THRESHOLD_CM);
        let err = service
            .reconcile_slot_by_id(9, &working(10))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn manual_location_edit_does_not_undo_reconciliation() {
        let repos = Arc::new(FlakyRepos::new(memory_store().await));
        let (_, ids) = wired(&repos, &[SlotStatus::Available]).await;
        repos.race_slot_update_with(SlotStatus::Occupied);

        let saved = repos
            .parking_slots()
            .update(
                ids[0],
                &crate::domain::parking_slot::ParkingSlotPatch {
                    location: Some("Row F".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(saved.location, "Row F");
        assert_eq!(saved.status, Some(SlotStatus::Occupied));
        assert_eq!(status_of(&repos, ids[0]).await, Some(SlotStatus::Occupied));
    }
}
