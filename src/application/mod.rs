pub mod events;
pub mod services;

// Re-export key types for convenience
pub use events::{create_event_bus, Event, EventBus, EventSubscriber, SharedEventBus};
pub use services::{
    start_cascade_worker, CascadeHandler, DeviceService, HoldAdmissionService, SensorOutcome,
    SlotOutcome, SlotReconciliationService,
};
