use chrono::Utc;
use migration::OnConflict;
use sea_orm::{ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::error::store::StoreError;

pub struct RegistrationRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> RegistrationRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// What we currently believe the gateway has registered for a server.
    pub async fn list_for_server(
        &self,
        server_id: i32,
    ) -> Result<Vec<entity::registration::Model>, StoreError> {
        entity::prelude::Registration::find()
            .filter(entity::registration::Column::ServerId.eq(server_id))
            .all(self.db)
            .await
            .map_err(StoreError::from)
    }

    pub async fn find(
        &self,
        server_id: i32,
        command_name: &str,
    ) -> Result<Option<entity::registration::Model>, StoreError> {
        entity::prelude::Registration::find_by_id((server_id, command_name.to_string()))
            .one(self.db)
            .await
            .map_err(StoreError::from)
    }

    /// Records a confirmed remote registration, overwriting any previous
    /// belief for the same command. Called only after the gateway accepted
    /// the register/update call, so a row always reflects a real remote
    /// registration.
    pub async fn record(
        &self,
        server_id: i32,
        command_name: &str,
        remote_id: &str,
        schema_hash: &str,
    ) -> Result<entity::registration::Model, StoreError> {
        entity::prelude::Registration::insert(entity::registration::ActiveModel {
            server_id: ActiveValue::Set(server_id),
            command_name: ActiveValue::Set(command_name.to_string()),
            remote_id: ActiveValue::Set(remote_id.to_string()),
            schema_hash: ActiveValue::Set(schema_hash.to_string()),
            last_confirmed_at: ActiveValue::Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::columns([
                entity::registration::Column::ServerId,
                entity::registration::Column::CommandName,
            ])
            .update_columns([
                entity::registration::Column::RemoteId,
                entity::registration::Column::SchemaHash,
                entity::registration::Column::LastConfirmedAt,
            ])
            .to_owned(),
        )
        .exec_with_returning(self.db)
        .await
        .map_err(StoreError::from)
    }

    pub async fn remove(&self, server_id: i32, command_name: &str) -> Result<(), StoreError> {
        entity::prelude::Registration::delete_by_id((server_id, command_name.to_string()))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Drops all belief state for a server that left. Remote registrations
    /// are not deleted; the gateway already evicted them with the server.
    pub async fn delete_for_server(&self, server_id: i32) -> Result<u64, StoreError> {
        let result = entity::prelude::Registration::delete_many()
            .filter(entity::registration::Column::ServerId.eq(server_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
