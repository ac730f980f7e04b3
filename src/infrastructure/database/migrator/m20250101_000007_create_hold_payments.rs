//! Create hold_payments table

use sea_orm_migration::prelude::*;

use super::m20250101_000005_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HoldPayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HoldPayments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HoldPayments::UserId).integer().not_null())
                    .col(ColumnDef::new(HoldPayments::Amount).double().not_null())
                    .col(ColumnDef::new(HoldPayments::PaymentMethod).string().not_null())
                    .col(ColumnDef::new(HoldPayments::IsDone).boolean())
                    .col(
                        ColumnDef::new(HoldPayments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HoldPayments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hold_payments_user")
                            .from(HoldPayments::Table, HoldPayments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_hold_payments_is_done")
                    .table(HoldPayments::Table)
                    .col(HoldPayments::IsDone)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HoldPayments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum HoldPayments {
    Table,
    Id,
    UserId,
    Amount,
    PaymentMethod,
    IsDone,
    CreatedAt,
    UpdatedAt,
}
