//! Hold payment aggregate

pub mod model;
pub mod repository;

pub use model::{
    admit, AvailabilitySnapshot, HoldPayment, HoldPaymentFilter, HoldPaymentPatch,
    HoldPaymentStats, NewHoldPayment,
};
pub use repository::HoldPaymentRepository;
