use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::error::store::StoreError;
use crate::model::name::{normalize_name, Scope};

pub struct NameIndexRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> NameIndexRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Active bindings for a name within a scope.
    ///
    /// Returns a vector rather than an option: the one-active invariant says
    /// there is at most one, but the resolver performs a defensive ambiguity
    /// check on top and needs to see every match to report corruption.
    pub async fn find_active(
        &self,
        scope: Scope,
        raw_name: &str,
    ) -> Result<Vec<entity::name_index::Model>, StoreError> {
        entity::prelude::NameIndex::find()
            .filter(entity::name_index::Column::ScopeId.eq(scope.0))
            .filter(entity::name_index::Column::NameNorm.eq(normalize_name(raw_name)))
            .filter(entity::name_index::Column::Active.eq(true))
            .all(self.db)
            .await
            .map_err(StoreError::from)
    }

    /// Binds a name to a server within a scope, superseding any current
    /// binding for the same name.
    ///
    /// Existing active rows for `(scope, name)` are marked inactive with a
    /// deactivation timestamp, then a fresh active row is inserted. The two
    /// steps must run inside one transaction (pass a `DatabaseTransaction`
    /// as the connection) or a crash in between could leave the name
    /// unbound. Re-registering the identical binding is a no-op returning
    /// the existing row.
    pub async fn register(
        &self,
        scope: Scope,
        raw_name: &str,
        server_id: i32,
    ) -> Result<entity::name_index::Model, StoreError> {
        let current = self.find_active(scope, raw_name).await?;

        // Identical binding already active: nothing to supersede.
        if let [existing] = current.as_slice() {
            if existing.server_id == server_id && existing.raw_name == raw_name {
                return Ok(existing.clone());
            }
        }

        if !current.is_empty() {
            let ids: Vec<i32> = current.iter().map(|m| m.id).collect();
            entity::prelude::NameIndex::update_many()
                .col_expr(entity::name_index::Column::Active, Expr::value(false))
                .col_expr(
                    entity::name_index::Column::DeactivatedAt,
                    Expr::value(Utc::now()),
                )
                .filter(entity::name_index::Column::Id.is_in(ids))
                .exec(self.db)
                .await?;
        }

        entity::name_index::ActiveModel {
            scope_id: ActiveValue::Set(scope.0),
            raw_name: ActiveValue::Set(raw_name.to_string()),
            name_norm: ActiveValue::Set(normalize_name(raw_name)),
            server_id: ActiveValue::Set(server_id),
            active: ActiveValue::Set(true),
            registered_at: ActiveValue::Set(Utc::now()),
            deactivated_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await
        .map_err(StoreError::from)
    }

    /// Full binding history for a name within a scope, oldest first.
    /// Inactive rows are retained for audit and show up here.
    pub async fn history(
        &self,
        scope: Scope,
        raw_name: &str,
    ) -> Result<Vec<entity::name_index::Model>, StoreError> {
        entity::prelude::NameIndex::find()
            .filter(entity::name_index::Column::ScopeId.eq(scope.0))
            .filter(entity::name_index::Column::NameNorm.eq(normalize_name(raw_name)))
            .order_by_asc(entity::name_index::Column::Id)
            .all(self.db)
            .await
            .map_err(StoreError::from)
    }

    /// Deactivates every active binding that points at a removed server,
    /// in any scope.
    pub async fn deactivate_for_server(&self, server_id: i32) -> Result<u64, StoreError> {
        let result = entity::prelude::NameIndex::update_many()
            .col_expr(entity::name_index::Column::Active, Expr::value(false))
            .col_expr(
                entity::name_index::Column::DeactivatedAt,
                Expr::value(Utc::now()),
            )
            .filter(entity::name_index::Column::ServerId.eq(server_id))
            .filter(entity::name_index::Column::Active.eq(true))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
