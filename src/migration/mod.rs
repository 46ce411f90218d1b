use sea_orm_migration::prelude::*;

mod m20250301_000001_create_schools_table;
mod m20250301_000002_create_class_groups_table;
mod m20250301_000003_create_principals_table;
mod m20250301_000004_create_reports_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_schools_table::Migration),
            Box::new(m20250301_000002_create_class_groups_table::Migration),
            Box::new(m20250301_000003_create_principals_table::Migration),
            Box::new(m20250301_000004_create_reports_table::Migration),
        ]
    }
}
