//! Create parking_activities table

use sea_orm_migration::prelude::*;

use super::m20250101_000003_create_parking_slots::ParkingSlots;
use super::m20250101_000005_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ParkingActivities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ParkingActivities::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ParkingActivities::UserId).integer().not_null())
                    .col(ColumnDef::new(ParkingActivities::SlotId).integer())
                    .col(
                        ColumnDef::new(ParkingActivities::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ParkingActivities::EndTime).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(ParkingActivities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingActivities::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_parking_activities_user")
                            .from(ParkingActivities::Table, ParkingActivities::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_parking_activities_slot")
                            .from(ParkingActivities::Table, ParkingActivities::SlotId)
                            .to(ParkingSlots::Table, ParkingSlots::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_parking_activities_user")
                    .table(ParkingActivities::Table)
                    .col(ParkingActivities::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ParkingActivities::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ParkingActivities {
    Table,
    Id,
    UserId,
    SlotId,
    StartTime,
    EndTime,
    CreatedAt,
    UpdatedAt,
}
