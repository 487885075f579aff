//! Name-to-server bindings with full history.
//!
//! `name_norm` (trimmed, lowercased) is the lookup key; `raw_name` keeps the
//! original casing for display and audit. At most one row per
//! `(scope_id, name_norm)` may be active at a time; the invariant is
//! enforced transactionally in the repository, not by a table constraint,
//! because superseded rows stay behind as inactive history.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "name_index")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Internal id of the server whose namespace this binding lives in.
    pub scope_id: i32,
    pub raw_name: String,
    pub name_norm: String,
    /// Internal id of the server the name points at.
    pub server_id: i32,
    pub active: bool,
    pub registered_at: DateTimeUtc,
    pub deactivated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::server::Entity",
        from = "Column::ServerId",
        to = "super::server::Column::Id"
    )]
    Server,
    #[sea_orm(
        belongs_to = "super::server::Entity",
        from = "Column::ScopeId",
        to = "super::server::Column::Id"
    )]
    Scope,
}

impl ActiveModelBehavior for ActiveModel {}
