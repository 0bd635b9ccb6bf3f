use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Deals {
    Table,
    Id,
    PropertyId,
    BuyerId,
    SellerId,
    Data,
    CreatedAt,
    UpdatedAt,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250301_000003_create_deals_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // No foreign keys: property and client ids are weak references
        manager
            .create_table(
                Table::create()
                    .table(Deals::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Deals::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Deals::PropertyId).string())
                    .col(ColumnDef::new(Deals::BuyerId).string())
                    .col(ColumnDef::new(Deals::SellerId).string())
                    .col(ColumnDef::new(Deals::Data).text().not_null())
                    .col(ColumnDef::new(Deals::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Deals::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_deals_property")
                    .table(Deals::Table)
                    .col(Deals::PropertyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_deals_buyer")
                    .table(Deals::Table)
                    .col(Deals::BuyerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_deals_seller")
                    .table(Deals::Table)
                    .col(Deals::SellerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Deals::Table).to_owned())
            .await
    }
}
