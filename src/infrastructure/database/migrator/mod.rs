//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_arduinos;
mod m20250101_000002_create_sensors;
mod m20250101_000003_create_parking_slots;
mod m20250101_000004_create_services;
mod m20250101_000005_create_users;
mod m20250101_000006_create_parking_activities;
mod m20250101_000007_create_hold_payments;
mod m20250101_000008_create_parking_payments;
mod m20250101_000009_create_admission_guard;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_arduinos::Migration),
            Box::new(m20250101_000002_create_sensors::Migration),
            Box::new(m20250101_000003_create_parking_slots::Migration),
            Box::new(m20250101_000004_create_services::Migration),
            Box::new(m20250101_000005_create_users::Migration),
            Box::new(m20250101_000006_create_parking_activities::Migration),
            Box::new(m20250101_000007_create_hold_payments::Migration),
            Box::new(m20250101_000008_create_parking_payments::Migration),
            Box::new(m20250101_000009_create_admission_guard::Migration),
        ]
    }
}
