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
                    .table(Command::Table)
                    .if_not_exists()
                    .col(integer(Command::ServerId))
                    .col(string(Command::Name))
                    .col(string(Command::Description))
                    .col(text(Command::Params))
                    .col(string(Command::SchemaHash))
                    .primary_key(
                        Index::create()
                            .col(Command::ServerId)
                            .col(Command::Name),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_command_server_id")
                            .from(Command::Table, Command::ServerId)
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
            .drop_table(Table::drop().table(Command::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Command {
    Table,
    ServerId,
    Name,
    Description,
    Params,
    SchemaHash,
}
