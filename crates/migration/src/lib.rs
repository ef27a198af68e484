//! Migrator for the relational backend. Only `profiles` lives there; cats and
//! vets are documents in the document store.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_profiles;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_profiles::Migration)]
    }
}
