//! Cascade worker
//!
//! Background task that consumes device events and runs the follow-up work:
//!
//! - `ArduinoStatusChanged` to maintenance forces every attached sensor into
//!   maintenance. With chaining on, each forced sensor is re-announced as a
//!   `SensorReadingUpdated` so its slots follow immediately.
//! - `SensorReadingUpdated` reconciles every slot wired to that sensor.
//!
//! Failures are logged and counted, never sent back to the publisher.

use std::sync::Arc;

use chrono::Utc;
use futures_util::future::join_all;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::slot_reconciliation::SlotReconciliationService;
use crate::application::events::{
    ArduinoStatusChangedEvent, Event, EventBus, EventMessage, SensorReadingUpdatedEvent,
    SharedEventBus,
};
use crate::domain::sensor::{DeviceStatus, SensorReading};
use crate::domain::{DomainResult, RepositoryProvider};
use crate::shared::shutdown::ShutdownSignal;

/// Result of forcing one sensor into maintenance
#[derive(Debug)]
pub struct SensorOutcome {
    pub sensor_id: i32,
    pub result: DomainResult<()>,
}

pub struct CascadeHandler {
    repos: Arc<dyn RepositoryProvider>,
    reconciler: Arc<SlotReconciliationService>,
    event_bus: SharedEventBus,
    chain_to_slots: bool,
}

impl CascadeHandler {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        reconciler: Arc<SlotReconciliationService>,
        event_bus: SharedEventBus,
        chain_to_slots: bool,
    ) -> Self {
        Self {
            repos,
            reconciler,
            event_bus,
            chain_to_slots,
        }
    }

    /// Force every sensor owned by `arduino_id` into maintenance.
    ///
    /// Each sensor is written independently; the returned list holds one
    /// entry per sensor. Only failing to list the sensors is an error.
    pub async fn cascade_arduino_maintenance(
        &self,
        arduino_id: i32,
    ) -> DomainResult<Vec<SensorOutcome>> {
        let sensors = self.repos.sensors().find_by_arduino(arduino_id).await?;
        metrics::counter!("arduino_maintenance_cascades_total").increment(1);

        let outcomes: Vec<SensorOutcome> = join_all(sensors.iter().map(|sensor| async move {
            SensorOutcome {
                sensor_id: sensor.id,
                result: self
                    .repos
                    .sensors()
                    .update_status(sensor.id, DeviceStatus::Maintenance)
                    .await,
            }
        }))
        .await;

        let mut failed = 0;
        for outcome in &outcomes {
            if let Err(e) = &outcome.result {
                failed += 1;
                warn!(
                    arduino_id,
                    sensor_id = outcome.sensor_id,
                    error = %e,
                    "Could not force sensor into maintenance"
                );
            }
        }
        info!(
            arduino_id,
            sensors = outcomes.len(),
            failed,
            "Arduino maintenance cascaded to sensors"
        );

        if self.chain_to_slots {
            for (sensor, outcome) in sensors.iter().zip(&outcomes) {
                if outcome.result.is_ok() {
                    self.event_bus
                        .publish(Event::SensorReadingUpdated(SensorReadingUpdatedEvent {
                            sensor_id: sensor.id,
                            status: DeviceStatus::Maintenance.as_str().to_string(),
                            distance_cm: sensor.sensor_range,
                            timestamp: Utc::now(),
                        }));
                }
            }
        }

        Ok(outcomes)
    }

    async fn on_arduino_status(&self, event: &ArduinoStatusChangedEvent) {
        let status: DeviceStatus = match event.status.parse() {
            Ok(status) => status,
            Err(e) => {
                warn!(arduino_id = event.arduino_id, error = %e, "Ignoring arduino event");
                return;
            }
        };
        if status != DeviceStatus::Maintenance {
            return;
        }
        if let Err(e) = self.cascade_arduino_maintenance(event.arduino_id).await {
            warn!(arduino_id = event.arduino_id, error = %e, "Arduino maintenance cascade failed");
        }
    }

    async fn on_sensor_reading(&self, event: &SensorReadingUpdatedEvent) {
        let reading = event
            .status
            .parse::<DeviceStatus>()
            .and_then(|health| SensorReading::new(health, event.distance_cm));
        let reading = match reading {
            Ok(reading) => reading,
            Err(e) => {
                warn!(sensor_id = event.sensor_id, error = %e, "Ignoring sensor event");
                return;
            }
        };

        if let Err(e) = self
            .reconciler
            .reconcile_sensor_cascade(event.sensor_id, &reading)
            .await
        {
            warn!(sensor_id = event.sensor_id, error = %e, "Sensor cascade failed");
        }
    }

    /// Dispatch one event. Events the cascades do not care about are ignored.
    pub async fn handle(&self, message: &EventMessage) {
        match &message.event {
            Event::ArduinoStatusChanged(e) => self.on_arduino_status(e).await,
            Event::SensorReadingUpdated(e) => self.on_sensor_reading(e).await,
            Event::SlotStatusChanged(_) | Event::HoldPaymentAdmitted(_) => {}
        }
    }
}

/// Start the cascade worker background task.
///
/// The worker reads from its own lossless [`EventQueue`](crate::application::events::EventQueue),
/// attached before the task is spawned, so nothing published after this
/// call returns is missed. On shutdown the events already queued, and any
/// they chain into, are handled before the task ends.
pub fn start_cascade_worker(
    handler: Arc<CascadeHandler>,
    event_bus: &EventBus,
    shutdown: ShutdownSignal,
) -> JoinHandle<()> {
    let mut queue = event_bus.queue();

    tokio::spawn(async move {
        info!("Cascade worker started");

        loop {
            tokio::select! {
                message = queue.recv() => {
                    let Some(message) = message else {
                        debug!("Event bus closed");
                        break;
                    };
                    handler.handle(&message).await;
                }
                _ = shutdown.wait() => {
                    info!(pending = queue.len(), "Cascade worker draining before shutdown");
                    let mut drained = 0usize;
                    while let Some(message) = queue.try_recv() {
                        handler.handle(&message).await;
                        drained += 1;
                    }
                    info!(drained, "Cascade worker shutting down");
                    break;
                }
            }
        }

        info!("Cascade worker stopped");
    })
}
