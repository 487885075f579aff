//! A guild/workspace the bot is (or was) a member of.
//!
//! `id` is the internal identifier everything else references; it never
//! changes for a given `platform_id`. `active` is flipped off instead of
//! deleting the row so that name-index history stays resolvable.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "server")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Gateway-assigned snowflake, stored as text.
    #[sea_orm(unique)]
    pub platform_id: String,
    /// Current display name; mutable and not unique.
    pub name: String,
    pub joined_at: DateTimeUtc,
    /// Null until the first fully clean sync.
    pub last_sync_at: Option<DateTimeUtc>,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::registration::Entity")]
    Registration,
    #[sea_orm(has_many = "super::command::Entity")]
    Command,
}

impl Related<super::registration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registration.def()
    }
}

impl Related<super::command::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Command.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
