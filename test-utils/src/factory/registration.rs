//! Registration factory for creating test registration records.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test registration records with customizable fields.
///
/// Requires the owning server's internal id and the registered command name
/// since registrations are keyed by `(server_id, command_name)`.
pub struct RegistrationFactory<'a> {
    db: &'a DatabaseConnection,
    server_id: i32,
    command_name: String,
    remote_id: String,
    schema_hash: String,
}

impl<'a> RegistrationFactory<'a> {
    /// Creates a new RegistrationFactory with default values.
    ///
    /// Defaults:
    /// - remote_id: auto-incremented counter value as string
    /// - schema_hash: `"hash-{id}"`
    pub fn new(db: &'a DatabaseConnection, server_id: i32, command_name: impl Into<String>) -> Self {
        let id = next_id();
        Self {
            db,
            server_id,
            command_name: command_name.into(),
            remote_id: id.to_string(),
            schema_hash: format!("hash-{}", id),
        }
    }

    pub fn remote_id(mut self, remote_id: impl Into<String>) -> Self {
        self.remote_id = remote_id.into();
        self
    }

    pub fn schema_hash(mut self, schema_hash: impl Into<String>) -> Self {
        self.schema_hash = schema_hash.into();
        self
    }

    /// Builds and inserts the registration record into the database.
    pub async fn build(self) -> Result<entity::registration::Model, DbErr> {
        entity::registration::ActiveModel {
            server_id: ActiveValue::Set(self.server_id),
            command_name: ActiveValue::Set(self.command_name),
            remote_id: ActiveValue::Set(self.remote_id),
            schema_hash: ActiveValue::Set(self.schema_hash),
            last_confirmed_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a registration record with default values.
pub async fn create_registration(
    db: &DatabaseConnection,
    server_id: i32,
    command_name: &str,
) -> Result<entity::registration::Model, DbErr> {
    RegistrationFactory::new(db, server_id, command_name)
        .build()
        .await
}
