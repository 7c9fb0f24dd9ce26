//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20260815_000001_create_profiles;
mod m20260815_000002_create_incidents;
mod m20260815_000003_create_corrective_actions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260815_000001_create_profiles::Migration),
            Box::new(m20260815_000002_create_incidents::Migration),
            Box::new(m20260815_000003_create_corrective_actions::Migration),
        ]
    }
}
