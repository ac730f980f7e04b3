//! Create arduinos table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Arduinos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Arduinos::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Arduinos::IpAddress)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Arduinos::Location).string().not_null())
                    .col(
                        ColumnDef::new(Arduinos::Status)
                            .string()
                            .not_null()
                            .default("working"),
                    )
                    .col(
                        ColumnDef::new(Arduinos::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Arduinos::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Arduinos::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Arduinos {
    Table,
    Id,
    IpAddress,
    Location,
    Status,
    CreatedAt,
    UpdatedAt,
}
