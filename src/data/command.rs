use migration::OnConflict;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::error::store::StoreError;
use crate::model::command::CommandDescriptor;

pub struct CommandRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CommandRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// The desired command set for a server, as descriptors.
    pub async fn list_for_server(
        &self,
        server_id: i32,
    ) -> Result<Vec<CommandDescriptor>, StoreError> {
        let models = entity::prelude::Command::find()
            .filter(entity::command::Column::ServerId.eq(server_id))
            .all(self.db)
            .await?;

        models
            .iter()
            .map(CommandDescriptor::from_model)
            .collect::<Result<Vec<_>, _>>()
    }

    /// Inserts or replaces one desired command definition.
    pub async fn upsert(
        &self,
        server_id: i32,
        command: &CommandDescriptor,
    ) -> Result<entity::command::Model, StoreError> {
        entity::prelude::Command::insert(command.to_active_model(server_id))
            .on_conflict(
                OnConflict::columns([
                    entity::command::Column::ServerId,
                    entity::command::Column::Name,
                ])
                .update_columns([
                    entity::command::Column::Description,
                    entity::command::Column::Params,
                    entity::command::Column::SchemaHash,
                ])
                .to_owned(),
            )
            .exec_with_returning(self.db)
            .await
            .map_err(StoreError::from)
    }

    /// Seeds commands a server does not have yet without touching existing
    /// definitions. Used for the default command set on first sync.
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of commands actually inserted
    pub async fn insert_missing(
        &self,
        server_id: i32,
        commands: &[CommandDescriptor],
    ) -> Result<usize, StoreError> {
        let mut inserted = 0;

        for command in commands {
            let existing = entity::prelude::Command::find_by_id((server_id, command.name.clone()))
                .one(self.db)
                .await?;

            if existing.is_none() {
                command.to_active_model(server_id).insert(self.db).await?;
                inserted += 1;
            }
        }

        Ok(inserted)
    }
}
