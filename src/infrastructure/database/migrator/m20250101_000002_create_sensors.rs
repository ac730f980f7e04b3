//! Create sensors table

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_arduinos::Arduinos;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sensors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sensors::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sensors::SensorType).string().not_null())
                    .col(
                        ColumnDef::new(Sensors::Status)
                            .string()
                            .not_null()
                            .default("working"),
                    )
                    .col(
                        ColumnDef::new(Sensors::SensorRange)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Sensors::ArduinoId).integer())
                    .col(
                        ColumnDef::new(Sensors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sensors::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sensors_arduino")
                            .from(Sensors::Table, Sensors::ArduinoId)
                            .to(Arduinos::Table, Arduinos::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sensors_arduino")
                    .table(Sensors::Table)
                    .col(Sensors::ArduinoId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sensors::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Sensors {
    Table,
    Id,
    SensorType,
    Status,
    SensorRange,
    ArduinoId,
    CreatedAt,
    UpdatedAt,
}
