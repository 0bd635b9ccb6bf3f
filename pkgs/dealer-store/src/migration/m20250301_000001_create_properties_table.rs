use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Properties {
    Table,
    Id,
    PropertyCode,
    Status,
    Kind,
    Data,
    CreatedAt,
    UpdatedAt,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250301_000001_create_properties_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Properties::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Properties::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Properties::PropertyCode).string())
                    .col(ColumnDef::new(Properties::Status).string())
                    .col(ColumnDef::new(Properties::Kind).string())
                    .col(ColumnDef::new(Properties::Data).text().not_null())
                    .col(ColumnDef::new(Properties::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Properties::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_properties_code")
                    .table(Properties::Table)
                    .col(Properties::PropertyCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_properties_status")
                    .table(Properties::Table)
                    .col(Properties::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_properties_kind")
                    .table(Properties::Table)
                    .col(Properties::Kind)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Properties::Table).to_owned())
            .await
    }
}
