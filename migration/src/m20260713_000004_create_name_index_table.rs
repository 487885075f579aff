use sea_orm_migration::{prelude::*, schema::*};

use super::m20260712_000001_create_server_table::Server;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NameIndex::Table)
                    .if_not_exists()
                    .col(pk_auto(NameIndex::Id))
                    .col(integer(NameIndex::ScopeId))
                    .col(string(NameIndex::RawName))
                    .col(string(NameIndex::NameNorm))
                    .col(integer(NameIndex::ServerId))
                    .col(boolean(NameIndex::Active).default(true))
                    .col(timestamp(NameIndex::RegisteredAt))
                    .col(timestamp_null(NameIndex::DeactivatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_name_index_scope_id")
                            .from(NameIndex::Table, NameIndex::ScopeId)
                            .to(Server::Table, Server::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_name_index_server_id")
                            .from(NameIndex::Table, NameIndex::ServerId)
                            .to(Server::Table, Server::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NameIndex::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum NameIndex {
    Table,
    Id,
    ScopeId,
    RawName,
    NameNorm,
    ServerId,
    Active,
    RegisteredAt,
    DeactivatedAt,
}
