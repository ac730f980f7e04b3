//! Application services

mod admission;
mod cascade;
mod devices;
mod slot_reconciliation;

#[cfg(test)]
pub(crate) mod testing;

pub use admission::HoldAdmissionService;
pub use cascade::{start_cascade_worker, CascadeHandler, SensorOutcome};
pub use devices::DeviceService;
pub use slot_reconciliation::{SlotOutcome, SlotReconciliationService};
