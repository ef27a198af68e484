//! Create `profiles` table, one row per authenticated identity.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(uuid(Profiles::Id).primary_key())
                    .col(ColumnDef::new(Profiles::FullName).string_len(128).null())
                    .col(ColumnDef::new(Profiles::AvatarUrl).text().null())
                    .col(ColumnDef::new(Profiles::Phone).string_len(32).null())
                    .col(string_len(Profiles::Role, 16).not_null().default("user"))
                    .col(ColumnDef::new(Profiles::UpdatedAt).timestamp_with_time_zone().null())
                    .check(Expr::col(Profiles::Role).is_in(["user", "admin"]))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Profiles::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Profiles { Table, Id, FullName, AvatarUrl, Phone, Role, UpdatedAt }
