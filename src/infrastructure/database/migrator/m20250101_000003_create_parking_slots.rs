//! Create parking_slots table
//!
//! `status` is nullable: rows imported without a status are reconciled on
//! the next sensor reading.

use sea_orm_migration::prelude::*;

use super::m20250101_000002_create_sensors::Sensors;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ParkingSlots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ParkingSlots::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ParkingSlots::Location).string().not_null())
                    .col(ColumnDef::new(ParkingSlots::Status).string())
                    .col(ColumnDef::new(ParkingSlots::SensorId).integer())
                    .col(
                        ColumnDef::new(ParkingSlots::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingSlots::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_parking_slots_sensor")
                            .from(ParkingSlots::Table, ParkingSlots::SensorId)
                            .to(Sensors::Table, Sensors::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_parking_slots_sensor")
                    .table(ParkingSlots::Table)
                    .col(ParkingSlots::SensorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_parking_slots_status")
                    .table(ParkingSlots::Table)
                    .col(ParkingSlots::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ParkingSlots::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ParkingSlots {
    Table,
    Id,
    Location,
    Status,
    SensorId,
    CreatedAt,
    UpdatedAt,
}
