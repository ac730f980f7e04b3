//! Parking payment aggregate

pub mod model;
pub mod repository;

pub use model::{
    MethodTotal, NewParkingPayment, ParkingPayment, ParkingPaymentFilter, ParkingPaymentPatch,
    PaymentStats,
};
pub use repository::ParkingPaymentRepository;
