use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Rentings {
    Table,
    Id,
    RentingCode,
    PropertyType,
    AvailabilityStatus,
    Data,
    CreatedAt,
    UpdatedAt,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250315_000001_create_rentings_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Added in a later schema version; existing tables are left alone
        manager
            .create_table(
                Table::create()
                    .table(Rentings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rentings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rentings::RentingCode).string())
                    .col(ColumnDef::new(Rentings::PropertyType).string())
                    .col(ColumnDef::new(Rentings::AvailabilityStatus).string())
                    .col(ColumnDef::new(Rentings::Data).text().not_null())
                    .col(ColumnDef::new(Rentings::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Rentings::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rentings_code")
                    .table(Rentings::Table)
                    .col(Rentings::RentingCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rentings_property_type")
                    .table(Rentings::Table)
                    .col(Rentings::PropertyType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rentings_availability")
                    .table(Rentings::Table)
                    .col(Rentings::AvailabilityStatus)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rentings::Table).to_owned())
            .await
    }
}
