use sea_orm_migration::prelude::*;

use super::m20260713_000004_create_name_index_table::NameIndex;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Non-unique on purpose: inactive history rows share the same
        // (scope_id, name_norm) pair. The one-active invariant is enforced
        // transactionally in the repository.
        manager
            .create_index(
                Index::create()
                    .name("idx_name_index_scope_name")
                    .table(NameIndex::Table)
                    .col(NameIndex::ScopeId)
                    .col(NameIndex::NameNorm)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_name_index_scope_name")
                    .table(NameIndex::Table)
                    .to_owned(),
            )
            .await
    }
}
