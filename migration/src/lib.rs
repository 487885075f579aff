pub use sea_orm_migration::prelude::*;

mod m20260712_000001_create_server_table;
mod m20260712_000002_create_command_table;
mod m20260712_000003_create_registration_table;
mod m20260713_000004_create_name_index_table;
mod m20260801_000005_add_name_index_lookup_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260712_000001_create_server_table::Migration),
            Box::new(m20260712_000002_create_command_table::Migration),
            Box::new(m20260712_000003_create_registration_table::Migration),
            Box::new(m20260713_000004_create_name_index_table::Migration),
            Box::new(m20260801_000005_add_name_index_lookup_index::Migration),
        ]
    }
}
