//! Server factory for creating test server entities.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test servers with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::server::ServerFactory;
///
/// let server = ServerFactory::new(&db)
///     .platform_id("987654321")
///     .name("CustomServer")
///     .build()
///     .await?;
/// ```
pub struct ServerFactory<'a> {
    db: &'a DatabaseConnection,
    platform_id: String,
    name: String,
    last_sync_at: Option<DateTime<Utc>>,
    active: bool,
}

impl<'a> ServerFactory<'a> {
    /// Creates a new ServerFactory with default values.
    ///
    /// Defaults:
    /// - platform_id: auto-incremented counter value as string
    /// - name: `"Server {id}"`
    /// - last_sync_at: `None` (never synced)
    /// - active: `true`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            platform_id: id.to_string(),
            name: format!("Server {}", id),
            last_sync_at: None,
            active: true,
        }
    }

    pub fn platform_id(mut self, platform_id: impl Into<String>) -> Self {
        self.platform_id = platform_id.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn last_sync_at(mut self, last_sync_at: Option<DateTime<Utc>>) -> Self {
        self.last_sync_at = last_sync_at;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Builds and inserts the server entity into the database.
    pub async fn build(self) -> Result<entity::server::Model, DbErr> {
        entity::server::ActiveModel {
            platform_id: ActiveValue::Set(self.platform_id),
            name: ActiveValue::Set(self.name),
            joined_at: ActiveValue::Set(Utc::now()),
            last_sync_at: ActiveValue::Set(self.last_sync_at),
            active: ActiveValue::Set(self.active),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a server with default values.
///
/// Shorthand for `ServerFactory::new(db).build().await`.
pub async fn create_server(db: &DatabaseConnection) -> Result<entity::server::Model, DbErr> {
    ServerFactory::new(db).build().await
}
