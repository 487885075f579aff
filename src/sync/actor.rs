//! Per-server sync actor.
//!
//! One actor owns all sync work for one platform server id. Events for the
//! same id are strictly serialized through the actor's mailbox; two syncs
//! for one server can never run their external calls concurrently. Actors
//! for different servers are independent tasks and interleave freely.

use std::sync::Arc;

use sea_orm::{DatabaseConnection, TransactionError, TransactionTrait};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::alert::{AlertSink, OperatorAlert};
use crate::bot::commands::default_commands;
use crate::data::command::CommandRepository;
use crate::data::name_index::NameIndexRepository;
use crate::data::registration::RegistrationRepository;
use crate::data::server::ServerRepository;
use crate::error::{store::StoreError, AppError};
use crate::gateway::CommandGateway;
use crate::model::name::Scope;
use crate::service::registry::{CommandRegistry, ReconcileReport};
use crate::service::resolver::NameResolver;
use crate::sync::SyncSettings;

/// Events routed into one server's mailbox.
#[derive(Debug, Clone)]
pub(crate) enum ServerEvent {
    Available { display_name: String },
    Removed,
}

/// Sync lifecycle of one server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncState {
    Disconnected,
    Syncing,
    Synced,
    Removed,
}

pub(crate) struct ServerActor {
    platform_id: String,
    db: DatabaseConnection,
    registry: CommandRegistry,
    resolver: Arc<NameResolver>,
    alerts: Arc<dyn AlertSink>,
    settings: SyncSettings,
    cancel: CancellationToken,
    state: SyncState,
}

impl ServerActor {
    /// Spawns the actor task and returns its mailbox sender and task handle.
    ///
    /// A `predecessor` is the task of the previous actor for the same
    /// platform id; this actor processes nothing until that task has fully
    /// finished, so a rejoin can never interleave with the old actor's
    /// teardown.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn spawn(
        platform_id: String,
        db: DatabaseConnection,
        gateway: Arc<dyn CommandGateway>,
        resolver: Arc<NameResolver>,
        alerts: Arc<dyn AlertSink>,
        settings: SyncSettings,
        cancel: CancellationToken,
        predecessor: Option<JoinHandle<()>>,
    ) -> (mpsc::Sender<ServerEvent>, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(16);

        let registry = CommandRegistry::new(db.clone(), gateway, settings.call_timeout);
        let actor = Self {
            platform_id,
            db,
            registry,
            resolver,
            alerts,
            settings,
            cancel,
            state: SyncState::Disconnected,
        };

        let task = tokio::spawn(actor.run(rx, predecessor));

        (tx, task)
    }

    async fn run(
        mut self,
        mut rx: mpsc::Receiver<ServerEvent>,
        predecessor: Option<JoinHandle<()>>,
    ) {
        if let Some(task) = predecessor {
            if task.await.is_err() {
                tracing::error!(server = %self.platform_id, "Previous actor task panicked");
            }
        }

        while let Some(event) = rx.recv().await {
            match event {
                ServerEvent::Available { display_name } => {
                    self.handle_available(&display_name).await;
                }
                ServerEvent::Removed => {
                    self.handle_removed().await;
                    // Terminal: drop the mailbox and end the task.
                    break;
                }
            }
        }
    }

    /// Runs the bounded-retry sync loop for one server-available event.
    ///
    /// A clean reconcile report moves the server to `Synced`. Reports with
    /// failures or transient errors stay in `Syncing` and retry with
    /// exponential backoff until the attempt cap, then the server drops to
    /// `Disconnected` and the operator is alerted. Integrity faults skip the
    /// retries entirely: retrying logically inconsistent state only masks
    /// corruption.
    async fn handle_available(&mut self, display_name: &str) {
        if self.state == SyncState::Removed {
            return;
        }
        self.state = SyncState::Syncing;

        let mut backoff = self.settings.backoff_base;
        let mut last_failures: Vec<(String, String)> = Vec::new();

        for attempt in 1..=self.settings.max_attempts {
            // A removal queued behind this event wins immediately.
            if self.cancel.is_cancelled() {
                return;
            }

            match self.sync_once(display_name).await {
                Ok(_) if self.cancel.is_cancelled() => {
                    // Stale result; removal handling follows from the mailbox.
                    return;
                }
                Ok(report) if report.is_clean() => {
                    self.state = SyncState::Synced;
                    tracing::info!(
                        server = %self.platform_id,
                        commands = report.entries().len(),
                        "Server synced"
                    );
                    return;
                }
                Ok(report) => {
                    last_failures = report
                        .failures()
                        .map(|(name, reason)| (name.to_string(), reason.to_string()))
                        .collect();
                    tracing::warn!(
                        server = %self.platform_id,
                        failed = last_failures.len(),
                        attempt,
                        "Reconcile pass left failures"
                    );
                }
                Err(e) if e.is_integrity_fault() => {
                    tracing::error!(
                        server = %self.platform_id,
                        "Data-integrity fault during sync: {}",
                        e
                    );
                    self.alerts
                        .alert(OperatorAlert {
                            platform_id: self.platform_id.clone(),
                            command_name: None,
                            kind: e.kind().to_string(),
                            message: e.to_string(),
                        })
                        .await;
                    self.state = SyncState::Disconnected;
                    return;
                }
                Err(e) => {
                    tracing::warn!(
                        server = %self.platform_id,
                        attempt,
                        "Sync attempt failed: {}",
                        e
                    );
                    last_failures = vec![("-".to_string(), e.kind().to_string())];
                }
            }

            if attempt < self.settings.max_attempts {
                tokio::select! {
                    _ = tokio::time::sleep(backoff) => {}
                    _ = self.cancel.cancelled() => return,
                }
                backoff *= 2;
            }
        }

        self.state = SyncState::Disconnected;
        tracing::error!(
            server = %self.platform_id,
            attempts = self.settings.max_attempts,
            "Sync attempts exhausted"
        );
        for (command_name, reason) in last_failures {
            self.alerts
                .alert(OperatorAlert {
                    platform_id: self.platform_id.clone(),
                    command_name: Some(command_name),
                    kind: "reconcile_failed".to_string(),
                    message: reason,
                })
                .await;
        }
    }

    /// One full sync pass: refresh the server row, bind its display name,
    /// seed missing defaults, and reconcile the desired set. A clean report
    /// stamps `last_sync_at`.
    async fn sync_once(&self, display_name: &str) -> Result<ReconcileReport, AppError> {
        let server_repo = ServerRepository::new(&self.db);
        let server = server_repo.upsert(&self.platform_id, display_name).await?;

        // Rename propagation: the current display name is (re-)bound in the
        // server's own scope; superseded bindings stay as history.
        self.resolver
            .register_name(server.id, display_name, Scope(server.id))
            .await?;

        let command_repo = CommandRepository::new(&self.db);
        let seeded = command_repo
            .insert_missing(server.id, &default_commands())
            .await?;
        if seeded > 0 {
            tracing::debug!(server = %self.platform_id, seeded, "Seeded default commands");
        }

        let desired = command_repo.list_for_server(server.id).await?;
        let report = self.registry.reconcile(&server, &desired, &self.cancel).await?;

        if report.is_clean() && !self.cancel.is_cancelled() {
            server_repo.update_last_sync(server.id).await?;
        }

        Ok(report)
    }

    /// Tears down local state for a server the gateway evicted.
    ///
    /// Remote registrations are not deleted; the gateway dropped them with
    /// the server, so remote state is moot. The store work runs in one
    /// transaction: inactive server, no registration records, no active
    /// name bindings pointing at it.
    async fn handle_removed(&mut self) {
        self.state = SyncState::Removed;

        let platform_id = self.platform_id.clone();
        let result = self
            .db
            .transaction::<_, Option<i32>, StoreError>(move |txn| {
                Box::pin(async move {
                    let Some(server) = ServerRepository::new(txn)
                        .find_by_platform_id(&platform_id)
                        .await?
                    else {
                        return Ok(None);
                    };

                    ServerRepository::new(txn).mark_inactive(server.id).await?;
                    RegistrationRepository::new(txn)
                        .delete_for_server(server.id)
                        .await?;
                    NameIndexRepository::new(txn)
                        .deactivate_for_server(server.id)
                        .await?;

                    Ok(Some(server.id))
                })
            })
            .await;

        match result {
            Ok(Some(server_id)) => {
                self.resolver.forget_server(server_id).await;
                tracing::info!(server = %self.platform_id, "Server removed; local state retired");
            }
            Ok(None) => {
                tracing::debug!(
                    server = %self.platform_id,
                    "Removal for a server the store never knew"
                );
            }
            Err(TransactionError::Connection(e)) => {
                tracing::error!(server = %self.platform_id, "Removal failed: {}", e);
            }
            Err(TransactionError::Transaction(e)) => {
                tracing::error!(server = %self.platform_id, "Removal failed: {}", e);
            }
        }
    }
}
