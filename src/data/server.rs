use chrono::{DateTime, Utc};
use migration::OnConflict;
use sea_orm::{
    sea_query::Expr, ActiveValue, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    QueryFilter,
};

use crate::error::store::StoreError;

pub struct ServerRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ServerRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts or refreshes a server row for a gateway-reported guild.
    ///
    /// The internal id is allocated once on first contact and never changes;
    /// on conflict only the display name and the active flag are updated.
    /// A server that left and rejoined is reactivated rather than
    /// re-inserted, keeping its name-index history attached.
    pub async fn upsert(
        &self,
        platform_id: &str,
        name: &str,
    ) -> Result<entity::server::Model, StoreError> {
        entity::prelude::Server::insert(entity::server::ActiveModel {
            platform_id: ActiveValue::Set(platform_id.to_string()),
            name: ActiveValue::Set(name.to_string()),
            joined_at: ActiveValue::Set(Utc::now()),
            last_sync_at: ActiveValue::Set(None),
            active: ActiveValue::Set(true),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(entity::server::Column::PlatformId)
                .update_columns([
                    entity::server::Column::Name,
                    entity::server::Column::Active,
                ])
                .to_owned(),
        )
        .exec_with_returning(self.db)
        .await
        .map_err(StoreError::from)
    }

    pub async fn find_by_platform_id(
        &self,
        platform_id: &str,
    ) -> Result<Option<entity::server::Model>, StoreError> {
        entity::prelude::Server::find()
            .filter(entity::server::Column::PlatformId.eq(platform_id))
            .one(self.db)
            .await
            .map_err(StoreError::from)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<entity::server::Model>, StoreError> {
        entity::prelude::Server::find_by_id(id)
            .one(self.db)
            .await
            .map_err(StoreError::from)
    }

    pub async fn list_active(&self) -> Result<Vec<entity::server::Model>, StoreError> {
        entity::prelude::Server::find()
            .filter(entity::server::Column::Active.eq(true))
            .all(self.db)
            .await
            .map_err(StoreError::from)
    }

    /// Active servers whose last clean sync is older than the cutoff, or
    /// that have never synced at all. Input to the resync sweep.
    pub async fn list_stale(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<entity::server::Model>, StoreError> {
        entity::prelude::Server::find()
            .filter(entity::server::Column::Active.eq(true))
            .filter(
                Condition::any()
                    .add(entity::server::Column::LastSyncAt.is_null())
                    .add(entity::server::Column::LastSyncAt.lt(cutoff)),
            )
            .all(self.db)
            .await
            .map_err(StoreError::from)
    }

    /// Flips the active flag off. The row is retained so historical name
    /// bindings stay resolvable for audit.
    pub async fn mark_inactive(&self, id: i32) -> Result<(), StoreError> {
        entity::prelude::Server::update_many()
            .col_expr(entity::server::Column::Active, Expr::value(false))
            .filter(entity::server::Column::Id.eq(id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Stamps a fully clean sync.
    pub async fn update_last_sync(&self, id: i32) -> Result<(), StoreError> {
        entity::prelude::Server::update_many()
            .col_expr(entity::server::Column::LastSyncAt, Expr::value(Utc::now()))
            .filter(entity::server::Column::Id.eq(id))
            .exec(self.db)
            .await?;

        Ok(())
    }
}
