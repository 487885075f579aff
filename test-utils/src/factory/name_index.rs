//! Name index factory for creating test name bindings.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test name-index entries with customizable fields.
///
/// Requires the scope (the server whose namespace the binding lives in) and
/// the target server id. `name_norm` is derived from `raw_name` unless set
/// explicitly.
pub struct NameIndexFactory<'a> {
    db: &'a DatabaseConnection,
    scope_id: i32,
    server_id: i32,
    raw_name: String,
    active: bool,
    registered_at: DateTime<Utc>,
    deactivated_at: Option<DateTime<Utc>>,
}

impl<'a> NameIndexFactory<'a> {
    /// Creates a new NameIndexFactory with default values.
    ///
    /// Defaults:
    /// - raw_name: `"Name {id}"` where id is auto-incremented
    /// - active: `true`
    /// - registered_at: now
    /// - deactivated_at: `None`
    pub fn new(db: &'a DatabaseConnection, scope_id: i32, server_id: i32) -> Self {
        let id = next_id();
        Self {
            db,
            scope_id,
            server_id,
            raw_name: format!("Name {}", id),
            active: true,
            registered_at: Utc::now(),
            deactivated_at: None,
        }
    }

    pub fn raw_name(mut self, raw_name: impl Into<String>) -> Self {
        self.raw_name = raw_name.into();
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn registered_at(mut self, registered_at: DateTime<Utc>) -> Self {
        self.registered_at = registered_at;
        self
    }

    pub fn deactivated_at(mut self, deactivated_at: Option<DateTime<Utc>>) -> Self {
        self.deactivated_at = deactivated_at;
        self
    }

    /// Builds and inserts the name-index entry into the database.
    pub async fn build(self) -> Result<entity::name_index::Model, DbErr> {
        let name_norm = self.raw_name.trim().to_lowercase();

        entity::name_index::ActiveModel {
            scope_id: ActiveValue::Set(self.scope_id),
            raw_name: ActiveValue::Set(self.raw_name),
            name_norm: ActiveValue::Set(name_norm),
            server_id: ActiveValue::Set(self.server_id),
            active: ActiveValue::Set(self.active),
            registered_at: ActiveValue::Set(self.registered_at),
            deactivated_at: ActiveValue::Set(self.deactivated_at),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates an active name binding with a default generated name.
pub async fn create_binding(
    db: &DatabaseConnection,
    scope_id: i32,
    server_id: i32,
) -> Result<entity::name_index::Model, DbErr> {
    NameIndexFactory::new(db, scope_id, server_id).build().await
}
