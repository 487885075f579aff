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
                    .table(Registration::Table)
                    .if_not_exists()
                    .col(integer(Registration::ServerId))
                    .col(string(Registration::CommandName))
                    .col(string(Registration::RemoteId))
                    .col(string(Registration::SchemaHash))
                    .col(timestamp(Registration::LastConfirmedAt))
                    .primary_key(
                        Index::create()
                            .col(Registration::ServerId)
                            .col(Registration::CommandName),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_registration_server_id")
                            .from(Registration::Table, Registration::ServerId)
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
            .drop_table(Table::drop().table(Registration::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Registration {
    Table,
    ServerId,
    CommandName,
    RemoteId,
    SchemaHash,
    LastConfirmedAt,
}
