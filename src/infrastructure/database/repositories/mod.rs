//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod arduino_repository;
pub mod hold_payment_repository;
pub mod parking_activity_repository;
pub mod parking_payment_repository;
pub mod parking_slot_repository;
pub mod repository_provider;
pub mod sensor_repository;
pub mod user_repository;
pub mod vehicle_service_repository;

pub use arduino_repository::SeaOrmArduinoRepository;
pub use hold_payment_repository::SeaOrmHoldPaymentRepository;
pub use parking_activity_repository::SeaOrmParkingActivityRepository;
pub use parking_payment_repository::SeaOrmParkingPaymentRepository;
pub use parking_slot_repository::SeaOrmParkingSlotRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use sensor_repository::SeaOrmSensorRepository;
pub use user_repository::SeaOrmUserRepository;
pub use vehicle_service_repository::SeaOrmVehicleServiceRepository;

use std::str::FromStr;

use sea_orm::{ConnectionTrait, DbErr, EntityTrait, PrimaryKeyTrait, SqlErr};

use crate::shared::errors::{DomainError, DomainResult};

// ── Shared helpers ──────────────────────────────────────────────

/// Parse an enum stored as text. A value we cannot read back means the row
/// was written by something else, which is a storage fault, not bad input.
pub(crate) fn parse_column<T>(table: &str, id: i32, value: &str) -> DomainResult<T>
where
    T: FromStr<Err = DomainError>,
{
    value
        .parse()
        .map_err(|e| DomainError::Storage(format!("{} row {}: {}", table, id, e)))
}

/// Map a unique-index violation to `Conflict`; anything else stays a storage error.
pub(crate) fn conflict_on_unique(err: DbErr, message: impl FnOnce() -> String) -> DomainError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::Conflict(message()),
        _ => err.into(),
    }
}

/// `NotFound` unless a row of `E` with primary key `id` exists.
pub(crate) async fn ensure_exists<E, C>(db: &C, entity: &'static str, id: i32) -> DomainResult<()>
where
    E: EntityTrait,
    C: ConnectionTrait,
    i32: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    match E::find_by_id(id).one(db).await? {
        Some(_) => Ok(()),
        None => Err(DomainError::not_found(entity, id)),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    use sea_orm_migration::MigratorTrait;

    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::database::{init_database, DatabaseConfig, Store};

    /// Fresh migrated in-memory database.
    pub async fn memory_store() -> Store {
        let db = init_database(&DatabaseConfig::in_memory())
            .await
            .expect("in-memory sqlite");
        Migrator::up(&db, None).await.expect("migrations apply");
        Store::new(db, Duration::from_secs(5))
    }

    /// Fresh migrated SQLite file in the temp dir, pooled over up to
    /// `max_connections` connections.
    pub async fn file_store(max_connections: u32) -> (Store, PathBuf) {
        let path = std::env::temp_dir().join(format!("parking-{}.db", uuid::Uuid::new_v4()));
        let mut config = DatabaseConfig::sqlite(&path.to_string_lossy());
        config.pool.max_connections = max_connections;
        let db = init_database(&config).await.expect("sqlite file");
        Migrator::up(&db, None).await.expect("migrations apply");
        (Store::new(db, Duration::from_secs(30)), path)
    }

    pub async fn remove_file_store(store: Store, path: &Path) {
        let _ = store.connection().clone().close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }
}
