//! Sea-ORM migrations for the embedded record database
//!
//! The migration list is the schema version. New versions append migrations
//! that create tables or indexes; existing migrations are never edited.

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_properties_table;
mod m20250301_000002_create_clients_table;
mod m20250301_000003_create_deals_table;
mod m20250301_000004_create_reminders_table;
mod m20250315_000001_create_rentings_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_properties_table::Migration),
            Box::new(m20250301_000002_create_clients_table::Migration),
            Box::new(m20250301_000003_create_deals_table::Migration),
            Box::new(m20250301_000004_create_reminders_table::Migration),
            Box::new(m20250315_000001_create_rentings_table::Migration),
        ]
    }
}
