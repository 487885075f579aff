//! Command factory for creating test desired-command entities.

use crate::factory::helpers::next_id;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test commands with customizable fields.
///
/// Requires the owning server's internal id since commands are keyed by
/// `(server_id, name)`.
pub struct CommandFactory<'a> {
    db: &'a DatabaseConnection,
    server_id: i32,
    name: String,
    description: String,
    params: String,
    schema_hash: String,
}

impl<'a> CommandFactory<'a> {
    /// Creates a new CommandFactory with default values.
    ///
    /// Defaults:
    /// - name: `"cmd-{id}"` where id is auto-incremented
    /// - description: `"Command {id}"`
    /// - params: `"[]"` (no parameters)
    /// - schema_hash: `"hash-{id}"`
    pub fn new(db: &'a DatabaseConnection, server_id: i32) -> Self {
        let id = next_id();
        Self {
            db,
            server_id,
            name: format!("cmd-{}", id),
            description: format!("Command {}", id),
            params: "[]".to_string(),
            schema_hash: format!("hash-{}", id),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn params(mut self, params: impl Into<String>) -> Self {
        self.params = params.into();
        self
    }

    pub fn schema_hash(mut self, schema_hash: impl Into<String>) -> Self {
        self.schema_hash = schema_hash.into();
        self
    }

    /// Builds and inserts the command entity into the database.
    pub async fn build(self) -> Result<entity::command::Model, DbErr> {
        entity::command::ActiveModel {
            server_id: ActiveValue::Set(self.server_id),
            name: ActiveValue::Set(self.name),
            description: ActiveValue::Set(self.description),
            params: ActiveValue::Set(self.params),
            schema_hash: ActiveValue::Set(self.schema_hash),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a command with default values for the given server.
pub async fn create_command(
    db: &DatabaseConnection,
    server_id: i32,
) -> Result<entity::command::Model, DbErr> {
    CommandFactory::new(db, server_id).build().await
}
