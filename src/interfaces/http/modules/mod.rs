//! HTTP modules, one per resource plus the operational endpoints

pub mod arduinos;
pub mod health;
pub mod hold_payments;
pub mod metrics;
pub mod parking_activities;
pub mod parking_payments;
pub mod parking_slots;
pub mod request_id;
pub mod sensors;
pub mod users;
pub mod vehicle_services;
