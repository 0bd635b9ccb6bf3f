use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Reminders {
    Table,
    Id,
    DueDate,
    Kind,
    Completed,
    Data,
    CreatedAt,
    UpdatedAt,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250301_000004_create_reminders_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reminders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reminders::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reminders::DueDate).string())
                    .col(ColumnDef::new(Reminders::Kind).string())
                    .col(ColumnDef::new(Reminders::Completed).string())
                    .col(ColumnDef::new(Reminders::Data).text().not_null())
                    .col(ColumnDef::new(Reminders::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Reminders::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reminders_due_date")
                    .table(Reminders::Table)
                    .col(Reminders::DueDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reminders_kind")
                    .table(Reminders::Table)
                    .col(Reminders::Kind)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reminders_completed")
                    .table(Reminders::Table)
                    .col(Reminders::Completed)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reminders::Table).to_owned())
            .await
    }
}
