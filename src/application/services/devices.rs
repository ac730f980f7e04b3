//! Arduino and sensor updates that feed the cascades
//!
//! The primary write happens here and is reported to the caller as soon as
//! it commits. The follow-up work (forcing sensors into maintenance,
//! reconciling slots) is announced on the event bus and handled by the
//! cascade worker, so it can never fail the primary update.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::slot_reconciliation::{SlotOutcome, SlotReconciliationService};
use crate::application::events::{
    ArduinoStatusChangedEvent, Event, SensorReadingUpdatedEvent, SharedEventBus,
};
use crate::domain::arduino::{Arduino, ArduinoPatch};
use crate::domain::sensor::{Sensor, SensorPatch};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

pub struct DeviceService {
    repos: Arc<dyn RepositoryProvider>,
    reconciler: Arc<SlotReconciliationService>,
    event_bus: SharedEventBus,
}

impl DeviceService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        reconciler: Arc<SlotReconciliationService>,
        event_bus: SharedEventBus,
    ) -> Self {
        Self {
            repos,
            reconciler,
            event_bus,
        }
    }

    /// Apply a partial Arduino update. A supplied status is announced as
    /// `ArduinoStatusChanged` once the row is saved.
    pub async fn update_arduino(&self, id: i32, patch: ArduinoPatch) -> DomainResult<Arduino> {
        let mut arduino = self
            .repos
            .arduinos()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Arduino", id))?;

        let status_supplied = patch.status.is_some();
        arduino.apply(patch)?;
        let saved = self.repos.arduinos().update(&arduino).await?;

        if status_supplied {
            info!(arduino_id = id, status = %saved.status, "Arduino status set");
            self.event_bus
                .publish(Event::ArduinoStatusChanged(ArduinoStatusChangedEvent {
                    arduino_id: saved.id,
                    status: saved.status.as_str().to_string(),
                    timestamp: Utc::now(),
                }));
        }
        Ok(saved)
    }

    /// Apply a partial sensor update. When health or distance was supplied,
    /// the stored reading is announced as `SensorReadingUpdated`.
    ///
    /// Only supplied columns are written, and the event carries the row as
    /// stored afterwards, so a maintenance status forced by the Arduino
    /// cascade survives a concurrent distance-only update.
    pub async fn update_sensor(&self, id: i32, patch: SensorPatch) -> DomainResult<Sensor> {
        let touches_reading = patch.touches_reading();
        let saved = self.repos.sensors().update(id, &patch).await?;

        if touches_reading {
            debug!(
                sensor_id = id,
                status = %saved.status,
                distance_cm = saved.sensor_range,
                "Sensor reading stored"
            );
            self.event_bus
                .publish(Event::SensorReadingUpdated(SensorReadingUpdatedEvent {
                    sensor_id: saved.id,
                    status: saved.status.as_str().to_string(),
                    distance_cm: saved.sensor_range,
                    timestamp: Utc::now(),
                }));
        }
        Ok(saved)
    }

    /// Reconcile a sensor's slots right now from its stored reading.
    pub async fn reconcile_sensor(&self, id: i32) -> DomainResult<Vec<SlotOutcome>> {
        let sensor = self
            .repos
            .sensors()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Sensor", id))?;
        let reading = sensor.reading()?;
        self.reconciler.reconcile_sensor_cascade(id, &reading).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::events::EventBus;
    use crate::domain::arduino::NewArduino;
    use crate::domain::parking_slot::{NewParkingSlot, SlotStatus, OCCUPANCY_THRESHOLD_CM};
    use crate::domain::sensor::{DeviceStatus, NewSensor};
    use crate::infrastructure::database::repositories::test_support::memory_store;
    use crate::application::services::testing::FlakyRepos;
    use crate::infrastructure::SeaOrmRepositoryProvider;

    async fn service() -> (DeviceService, Arc<SeaOrmRepositoryProvider>, Arc<EventBus>) {
        let repos = Arc::new(SeaOrmRepositoryProvider::new(memory_store().await));
        let bus = Arc::new(EventBus::new());
        let reconciler = Arc::new(SlotReconciliationService::new(
            repos.clone(),
            OCCUPANCY_THRESHOLD_CM,
        ));
        (
            DeviceService::new(repos.clone(), reconciler, bus.clone()),
            repos,
            bus,
        )
    }

    fn sensor(range: i32) -> NewSensor {
        NewSensor {
            sensor_type: "HC-SR04".into(),
            status: DeviceStatus::Working,
            sensor_range: range,
            arduino_id: None,
        }
    }

    #[tokio::test]
    async fn sensor_reading_update_is_announced() {
        let (devices, repos, bus) = service().await;
        let created = repos.sensors().create(sensor(100)).await.unwrap();
        let mut sub = bus.subscribe();

        let saved = devices
            .update_sensor(
                created.id,
                SensorPatch {
                    sensor_range: Some(2),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(saved.sensor_range, 2);

        let msg = sub.recv().await.unwrap();
        match msg.event {
            Event::SensorReadingUpdated(e) => {
                assert_eq!(e.sensor_id, created.id);
                assert_eq!(e.distance_cm, 2);
                assert_eq!(e.status, "working");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn out_of_range_reading_is_rejected_before_writing() {
        let (devices, repos, _bus) = service().await;
        let created = repos.sensors().create(sensor(100)).await.unwrap();

        let err = devices
            .update_sensor(
                created.id,
                SensorPatch {
                    sensor_range: Some(1001),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        let stored = repos.sensors().find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.sensor_range, 100);
    }

    #[tokio::test]
    async fn location_only_arduino_update_is_silent() {
        let (devices, repos, bus) = service().await;
        let hub = repos
            .arduinos()
            .create(NewArduino {
                ip_address: "10.1.1.1".into(),
                location: "Gate".into(),
                status: DeviceStatus::Working,
            })
            .await
            .unwrap();
        let mut sub = bus.subscribe();

        devices
            .update_arduino(
                hub.id,
                ArduinoPatch {
                    location: Some("North gate".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        devices
            .update_arduino(
                hub.id,
                ArduinoPatch {
                    status: Some(DeviceStatus::Maintenance),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let msg = sub.recv().await.unwrap();
        assert_eq!(msg.event.event_type(), "arduino_status_changed");
    }

    #[tokio::test]
    async fn direct_reconcile_uses_stored_reading() {
        let (devices, repos, _bus) = service().await;
        let created = repos.sensors().create(sensor(1)).await.unwrap();
        let slot = repos
            .parking_slots()
            .create(NewParkingSlot {
                location: "D-4".into(),
                status: SlotStatus::Available,
                sensor_id: Some(created.id),
            })
            .await
            .unwrap();

        let outcomes = devices.reconcile_sensor(created.id).await.unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].slot_id, slot.id);
        assert_eq!(
            outcomes[0].result.as_ref().unwrap().status,
            SlotStatus::Occupied
        );
    }

    #[tokio::test]
    async fn distance_update_keeps_maintenance_forced_underneath() {
        let repos = Arc::new(FlakyRepos::new(memory_store().await));
        let bus = Arc::new(EventBus::new());
        let reconciler = Arc::new(SlotReconciliationService::new(
            repos.clone(),
            OCCUPANCY_THRESHOLD_CM,
        ));
        let devices = DeviceService::new(repos.clone(), reconciler, bus.clone());
        let created = repos.sensors().create(sensor(100)).await.unwrap();
        let mut sub = bus.subscribe();

        repos.race_sensor_update_with(DeviceStatus::Maintenance);
        let saved = devices
            .update_sensor(
                created.id,
                SensorPatch {
                    sensor_range: Some(250),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(saved.sensor_range, 250);
        assert_eq!(saved.status, DeviceStatus::Maintenance);
        let stored = repos.sensors().find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.status, DeviceStatus::Maintenance);

        match sub.recv().await.unwrap().event {
            Event::SensorReadingUpdated(e) => {
                assert_eq!(e.status, "maintenance");
                assert_eq!(e.distance_cm, 250);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn updating_a_missing_sensor_is_not_found() {
        let (devices, _repos, _bus) = service().await;
        let err = devices
            .update_sensor(404, SensorPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Sensor", .. }));
    }
}
