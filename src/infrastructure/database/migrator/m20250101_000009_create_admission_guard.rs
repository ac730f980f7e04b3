//! Create admission_guard table and seed its single row

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdmissionGuard::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdmissionGuard::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AdmissionGuard::Generation)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        let seed = Query::insert()
            .into_table(AdmissionGuard::Table)
            .columns([AdmissionGuard::Id, AdmissionGuard::Generation])
            .values_panic([1.into(), 0.into()])
            .to_owned();
        manager.exec_stmt(seed).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdmissionGuard::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum AdmissionGuard {
    Table,
    Id,
    Generation,
}
