//! What we believe the gateway currently has registered for a server.
//!
//! A row exists only after a remote registration call succeeded. The row is
//! removed when the command is deleted remotely or the server leaves; a
//! `schema_hash` differing from the desired command's hash is what triggers
//! re-registration on the next reconcile pass.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "registration")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub server_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub command_name: String,
    /// Registration id assigned by the gateway, stored as text.
    pub remote_id: String,
    /// Schema hash confirmed by the last successful register/update call.
    pub schema_hash: String,
    pub last_confirmed_at: DateTimeUtc,
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
