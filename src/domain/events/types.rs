//! Domain events
//!
//! Published after the originating write has committed. Cascades consume
//! them; failures on the consuming side never reach the publisher.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    ArduinoStatusChanged(ArduinoStatusChangedEvent),
    SensorReadingUpdated(SensorReadingUpdatedEvent),
    SlotStatusChanged(SlotStatusChangedEvent),
    HoldPaymentAdmitted(HoldPaymentAdmittedEvent),
}

impl Event {
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::ArduinoStatusChanged(_) => "arduino_status_changed",
            Event::SensorReadingUpdated(_) => "sensor_reading_updated",
            Event::SlotStatusChanged(_) => "slot_status_changed",
            Event::HoldPaymentAdmitted(_) => "hold_payment_admitted",
        }
    }

    /// Id of the row the event is about
    pub fn subject_id(&self) -> i32 {
        match self {
            Event::ArduinoStatusChanged(e) => e.arduino_id,
            Event::SensorReadingUpdated(e) => e.sensor_id,
            Event::SlotStatusChanged(e) => e.slot_id,
            Event::HoldPaymentAdmitted(e) => e.hold_payment_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArduinoStatusChangedEvent {
    pub arduino_id: i32,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorReadingUpdatedEvent {
    pub sensor_id: i32,
    pub status: String,
    pub distance_cm: i32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotStatusChangedEvent {
    pub slot_id: i32,
    pub sensor_id: Option<i32>,
    pub previous: Option<String>,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldPaymentAdmittedEvent {
    pub hold_payment_id: i32,
    pub user_id: i32,
    pub available_count: u64,
    pub pending_count: u64,
    pub remaining: u64,
    pub timestamp: DateTime<Utc>,
}

/// Envelope carried on the event bus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_serializes_with_type_tag() {
        let msg = EventMessage::new(Event::SensorReadingUpdated(SensorReadingUpdatedEvent {
            sensor_id: 4,
            status: "working".into(),
            distance_cm: 2,
            timestamp: Utc::now(),
        }));
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "SensorReadingUpdated");
        assert_eq!(json["data"]["sensor_id"], 4);
        assert!(json["id"].is_string());
    }
}
