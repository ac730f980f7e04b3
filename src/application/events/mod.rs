//! Application events (pub/sub)
//!
//! Event types are defined in `domain::events`. The `EventBus`
//! implementation (broadcast observers plus lossless queues) lives here in
//! the application layer.

pub mod event_bus;

pub use crate::domain::events::*;

pub use event_bus::{create_event_bus, EventBus, EventQueue, EventSubscriber, SharedEventBus};
