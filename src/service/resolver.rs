//! Turns user-typed names into internal server ids.
//!
//! The resolver fronts the name-index repository with an in-memory cache.
//! Reads go through the cache and fall back to the store on a miss; writes
//! go to the store first and touch the cache only after the store commit, so
//! a failed rename can never leave a stale name being served from memory.
//! The cache is never the source of truth: it starts empty on every process
//! restart.

use std::collections::HashMap;

use sea_orm::{DatabaseConnection, TransactionError, TransactionTrait};
use tokio::sync::RwLock;

use crate::data::name_index::NameIndexRepository;
use crate::error::{resolve::ResolveError, store::StoreError, AppError};
use crate::model::name::{normalize_name, Scope};

pub struct NameResolver {
    db: DatabaseConnection,
    /// (scope, normalized name) -> target server id.
    cache: RwLock<HashMap<(i32, String), i32>>,
}

impl NameResolver {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolves an active name binding to a server id.
    ///
    /// Case-insensitive within the scope. Zero matches is `NotFound`. More
    /// than one active match cannot happen given the one-active invariant;
    /// the defensive check turns it into `Ambiguous`, a data-integrity fault
    /// that callers report rather than retry.
    pub async fn resolve(&self, raw_name: &str, scope: Scope) -> Result<i32, AppError> {
        let key = (scope.0, normalize_name(raw_name));

        if let Some(server_id) = self.cache.read().await.get(&key) {
            return Ok(*server_id);
        }

        let matches = NameIndexRepository::new(&self.db)
            .find_active(scope, raw_name)
            .await?;

        match matches.len() {
            0 => Err(ResolveError::NotFound {
                name: raw_name.to_string(),
                scope_id: scope.0,
            }
            .into()),
            1 => {
                let server_id = matches[0].server_id;
                self.cache.write().await.insert(key, server_id);
                Ok(server_id)
            }
            count => Err(ResolveError::Ambiguous {
                name: raw_name.to_string(),
                scope_id: scope.0,
                count,
            }
            .into()),
        }
    }

    /// Binds a name to a server, superseding any current binding for the
    /// same (name, scope).
    ///
    /// Deactivation of the old binding and insertion of the new one run in
    /// one transaction. Idempotent for identical arguments.
    pub async fn register_name(
        &self,
        server_id: i32,
        raw_name: &str,
        scope: Scope,
    ) -> Result<(), AppError> {
        let raw_owned = raw_name.to_string();

        self.db
            .transaction::<_, entity::name_index::Model, StoreError>(move |txn| {
                Box::pin(async move {
                    NameIndexRepository::new(txn)
                        .register(scope, &raw_owned, server_id)
                        .await
                })
            })
            .await
            .map_err(|err| match err {
                TransactionError::Connection(db) => StoreError::from(db),
                TransactionError::Transaction(store) => store,
            })?;

        // Write-through: the store committed, now the cache may follow.
        self.cache
            .write()
            .await
            .insert((scope.0, normalize_name(raw_name)), server_id);

        Ok(())
    }

    /// Drops every cached binding that points at a removed server.
    pub async fn forget_server(&self, server_id: i32) {
        self.cache
            .write()
            .await
            .retain(|_, target| *target != server_id);
    }
}
