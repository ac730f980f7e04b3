//! Event Bus for broadcasting events to subscribers
//!
//! Two kinds of consumer:
//!
//! - [`EventSubscriber`]: broadcast observer. A slow one loses the oldest
//!   events and is told how many.
//! - [`EventQueue`]: unbounded per-consumer queue that never drops. Work that
//!   must run for every event (the device cascades) reads from one of these.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::domain::events::{Event, EventMessage};

const DEFAULT_CAPACITY: usize = 1024;

/// Event bus for broadcasting events to all subscribers
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventMessage>,
    queues: Arc<Mutex<Vec<mpsc::UnboundedSender<EventMessage>>>>,
    subscriber_count: Arc<AtomicUsize>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            queues: Arc::new(Mutex::new(Vec::new())),
            subscriber_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn publish(&self, event: Event) {
        let message = EventMessage::new(event);
        let event_type = message.event.event_type();
        let subject_id = message.event.subject_id();

        metrics::counter!("parking_events_published_total", "type" => event_type).increment(1);

        {
            let mut queues = self.queues.lock().unwrap_or_else(PoisonError::into_inner);
            queues.retain(|queue| queue.send(message.clone()).is_ok());
        }

        match self.sender.send(message) {
            Ok(count) => {
                debug!(event_type, subject_id, subscribers = count, "Event published");
            }
            Err(_) => {
                debug!(event_type, subject_id, "Event published (no subscribers)");
            }
        }
    }

    pub fn subscribe(&self) -> EventSubscriber {
        let receiver = self.sender.subscribe();
        self.subscriber_count.fetch_add(1, Ordering::SeqCst);
        let count = self.subscriber_count.load(Ordering::SeqCst);
        info!(total = count, "New event subscriber");

        EventSubscriber {
            receiver,
            subscriber_count: self.subscriber_count.clone(),
        }
    }

    /// Lossless consumer: every event published after this call is queued
    /// until the returned [`EventQueue`] takes it or is dropped.
    pub fn queue(&self) -> EventQueue {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.queues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sender);
        let count = self.subscriber_count.fetch_add(1, Ordering::SeqCst) + 1;
        info!(total = count, "New event queue");

        EventQueue {
            receiver,
            subscriber_count: self.subscriber_count.clone(),
        }
    }

    /// Broadcast subscribers plus queues currently attached.
    pub fn subscriber_count(&self) -> usize {
        self.subscriber_count.load(Ordering::SeqCst)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Event subscriber that receives events from the bus
pub struct EventSubscriber {
    receiver: broadcast::Receiver<EventMessage>,
    subscriber_count: Arc<AtomicUsize>,
}

impl EventSubscriber {
    /// Next event, or `None` once the bus is gone.
    ///
    /// A subscriber that falls behind loses the oldest events; the gap is
    /// logged and counted, then delivery resumes with the oldest retained one.
    pub async fn recv(&mut self) -> Option<EventMessage> {
        loop {
            match self.receiver.recv().await {
                Ok(msg) => return Some(msg),
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(missed = count, "Subscriber lagged");
                    metrics::counter!("parking_events_lagged_total").increment(count);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return None;
                }
            }
        }
    }
}

impl Drop for EventSubscriber {
    fn drop(&mut self) {
        let prev = self.subscriber_count.fetch_sub(1, Ordering::SeqCst);
        info!(remaining = prev - 1, "Event subscriber disconnected");
    }
}

/// Per-consumer queue that receives every published event in order
pub struct EventQueue {
    receiver: mpsc::UnboundedReceiver<EventMessage>,
    subscriber_count: Arc<AtomicUsize>,
}

impl EventQueue {
    /// Next event, or `None` once the bus is gone and the queue is empty.
    pub async fn recv(&mut self) -> Option<EventMessage> {
        self.receiver.recv().await
    }

    /// Next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<EventMessage> {
        self.receiver.try_recv().ok()
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl Drop for EventQueue {
    fn drop(&mut self) {
        let prev = self.subscriber_count.fetch_sub(1, Ordering::SeqCst);
        info!(remaining = prev - 1, "Event queue detached");
    }
}

/// Shared event bus type
pub type SharedEventBus = Arc<EventBus>;

/// Create a shared event bus
pub fn create_event_bus() -> SharedEventBus {
    Arc::new(EventBus::new())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::events::ArduinoStatusChangedEvent;

    fn arduino_event(id: i32) -> Event {
        Event::ArduinoStatusChanged(ArduinoStatusChangedEvent {
            arduino_id: id,
            status: "maintenance".into(),
            timestamp: Utc::now(),
        })
    }

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        bus.publish(arduino_event(3));
        let msg = sub.recv().await.unwrap();
        assert_eq!(msg.event.subject_id(), 3);

        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn queue_keeps_every_event_past_broadcast_capacity() {
        let bus = EventBus::with_capacity(2);
        let mut observer = bus.subscribe();
        let mut queue = bus.queue();
        assert_eq!(bus.subscriber_count(), 2);

        for id in 1..=100 {
            bus.publish(arduino_event(id));
        }

        // the broadcast observer only sees what the ring still holds
        assert_eq!(observer.recv().await.unwrap().event.subject_id(), 99);

        assert_eq!(queue.len(), 100);
        for id in 1..=100 {
            assert_eq!(queue.recv().await.unwrap().event.subject_id(), id);
        }
        assert!(queue.try_recv().is_none());
    }

    #[tokio::test]
    async fn dropped_queue_is_detached() {
        let bus = EventBus::new();
        let queue = bus.queue();
        drop(queue);
        assert_eq!(bus.subscriber_count(), 0);

        bus.publish(arduino_event(1));
        assert!(bus.queues.lock().unwrap().is_empty());
    }
}
