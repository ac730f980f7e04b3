//! # Smart Parking API
//!
//! REST service for a sensor-instrumented parking facility: Arduino hubs,
//! distance sensors, parking slots, vehicle service plans, users, parking
//! sessions and payments.
//!
//! ## Architecture
//!
//! - **domain**: entities, their validation rules and repository traits
//! - **application**: slot reconciliation, device cascades, hold admission
//!   and the internal event bus
//! - **infrastructure**: SQLite persistence via SeaORM
//! - **interfaces**: HTTP handlers with Swagger documentation
//! - **server**: runtime wiring and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

pub use interfaces::http::{create_api_router, AppState};

pub use application::{create_event_bus, EventBus, SharedEventBus};
