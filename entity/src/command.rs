//! Desired command definition for one server.
//!
//! The composite primary key `(server_id, name)` is what enforces the
//! name-unique-per-server constraint at the storage layer. `params` holds the
//! JSON-encoded parameter schema; `schema_hash` is the deterministic digest of
//! the whole definition that reconciliation compares against the last
//! confirmed registration.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "command")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub server_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub description: String,
    /// JSON array of typed parameter definitions.
    pub params: String,
    pub schema_hash: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::server::Entity",
        from = "Column::ServerId",
        to = "super::server::Column::Id"
    )]
    Server,
}

impl Related<super::server::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Server.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
