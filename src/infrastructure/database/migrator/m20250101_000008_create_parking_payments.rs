//! Create parking_payments table

use sea_orm_migration::prelude::*;

use super::m20250101_000005_create_users::Users;
use super::m20250101_000006_create_parking_activities::ParkingActivities;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ParkingPayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ParkingPayments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ParkingPayments::UserId).integer().not_null())
                    .col(ColumnDef::new(ParkingPayments::ActivityId).integer())
                    .col(ColumnDef::new(ParkingPayments::Amount).double().not_null())
                    .col(
                        ColumnDef::new(ParkingPayments::PaymentMethod)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingPayments::PaidAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingPayments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingPayments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_parking_payments_user")
                            .from(ParkingPayments::Table, ParkingPayments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_parking_payments_activity")
                            .from(ParkingPayments::Table, ParkingPayments::ActivityId)
                            .to(ParkingActivities::Table, ParkingActivities::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_parking_payments_user")
                    .table(ParkingPayments::Table)
                    .col(ParkingPayments::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ParkingPayments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ParkingPayments {
    Table,
    Id,
    UserId,
    ActivityId,
    Amount,
    PaymentMethod,
    PaidAt,
    CreatedAt,
    UpdatedAt,
}
