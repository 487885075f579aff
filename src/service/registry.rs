//! Reconciliation of desired commands against the gateway's registered set.
//!
//! `reconcile` computes the difference between the desired command set and
//! the registration records for one server, then issues deletes, creates,
//! and updates against the gateway. Items are attempted independently; a
//! failure is captured in the report and never aborts the pass, so siblings
//! of a failing command still land durably. Remote failures are retried
//! once immediately and then left for the next pass rather than hammered in
//! a loop.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use tokio_util::sync::CancellationToken;

use crate::data::registration::RegistrationRepository;
use crate::error::store::StoreError;
use crate::gateway::{CommandGateway, GatewayError};
use crate::model::command::CommandDescriptor;

/// Per-command result of one reconcile pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Created,
    Updated,
    Deleted,
    Unchanged,
    Failed(String),
}

/// What one reconcile pass did, command by command, in issue order.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    entries: Vec<(String, CommandOutcome)>,
}

impl ReconcileReport {
    fn push(&mut self, name: &str, outcome: CommandOutcome) {
        self.entries.push((name.to_string(), outcome));
    }

    pub fn entries(&self) -> &[(String, CommandOutcome)] {
        &self.entries
    }

    pub fn outcome(&self, name: &str) -> Option<&CommandOutcome> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, outcome)| outcome)
    }

    /// Commands that failed, with their reasons.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|(name, outcome)| match outcome {
            CommandOutcome::Failed(reason) => Some((name.as_str(), reason.as_str())),
            _ => None,
        })
    }

    /// A pass with no failed entries; the server may be marked synced.
    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }

    /// True when nothing needed doing, the idempotent steady state.
    pub fn all_unchanged(&self) -> bool {
        self.entries
            .iter()
            .all(|(_, outcome)| *outcome == CommandOutcome::Unchanged)
    }
}

fn failure_reason(error: &GatewayError) -> String {
    match error {
        GatewayError::Timeout => "timeout".to_string(),
        GatewayError::Remote(msg) => format!("rejected: {}", msg),
    }
}

pub struct CommandRegistry {
    db: DatabaseConnection,
    gateway: Arc<dyn CommandGateway>,
    /// Deadline applied to every individual remote call.
    call_timeout: Duration,
}

impl CommandRegistry {
    pub fn new(db: DatabaseConnection, gateway: Arc<dyn CommandGateway>, call_timeout: Duration) -> Self {
        Self {
            db,
            gateway,
            call_timeout,
        }
    }

    /// Reconciles the desired command set for one server.
    ///
    /// All deletions are issued before any creation, so a name that is
    /// removed and re-added within one pass never collides on the gateway
    /// side. Each remote success is recorded in the store immediately, which
    /// keeps the belief state durable even when a sibling command fails.
    ///
    /// The cancellation token is checked before each remote call and again
    /// before recording its result: when a removal cancels an in-flight
    /// sync, at most the current call completes and no further writes are
    /// applied. The partial report is returned for logging; the caller
    /// discards it.
    ///
    /// # Returns
    /// - `Ok(ReconcileReport)` - Per-command outcomes in issue order
    /// - `Err(StoreError)` - Reading the registration records failed
    pub async fn reconcile(
        &self,
        server: &entity::server::Model,
        desired: &[CommandDescriptor],
        cancel: &CancellationToken,
    ) -> Result<ReconcileReport, StoreError> {
        let repo = RegistrationRepository::new(&self.db);
        let registrations = repo.list_for_server(server.id).await?;

        let registered: HashMap<&str, &entity::registration::Model> = registrations
            .iter()
            .map(|r| (r.command_name.as_str(), r))
            .collect();
        let desired_names: HashSet<&str> = desired.iter().map(|c| c.name.as_str()).collect();

        let mut report = ReconcileReport::default();

        // Phase 1: deletions.
        for record in &registrations {
            if desired_names.contains(record.command_name.as_str()) {
                continue;
            }
            if cancel.is_cancelled() {
                return Ok(report);
            }

            let result = self
                .attempt(|| {
                    self.gateway
                        .delete_command(&server.platform_id, &record.remote_id)
                })
                .await;

            if cancel.is_cancelled() {
                return Ok(report);
            }

            match result {
                Ok(()) => match repo.remove(server.id, &record.command_name).await {
                    Ok(()) => report.push(&record.command_name, CommandOutcome::Deleted),
                    Err(e) => report.push(
                        &record.command_name,
                        CommandOutcome::Failed(format!("store: {}", e)),
                    ),
                },
                Err(e) => {
                    tracing::warn!(
                        server = %server.platform_id,
                        command = %record.command_name,
                        "Failed to delete remote command: {}",
                        e
                    );
                    report.push(&record.command_name, CommandOutcome::Failed(failure_reason(&e)));
                }
            }
        }

        // Phase 2: creations and updates.
        for command in desired {
            let hash = command.schema_hash();

            let existing = registered.get(command.name.as_str());
            if let Some(record) = existing {
                if record.schema_hash == hash {
                    report.push(&command.name, CommandOutcome::Unchanged);
                    continue;
                }
            }

            if cancel.is_cancelled() {
                return Ok(report);
            }

            let result = match existing {
                Some(record) => {
                    self.attempt(|| {
                        self.gateway
                            .update_command(&server.platform_id, &record.remote_id, command)
                    })
                    .await
                }
                None => {
                    self.attempt(|| {
                        self.gateway.register_command(&server.platform_id, command)
                    })
                    .await
                }
            };

            if cancel.is_cancelled() {
                return Ok(report);
            }

            match result {
                Ok(remote_id) => {
                    let outcome = if existing.is_some() {
                        CommandOutcome::Updated
                    } else {
                        CommandOutcome::Created
                    };
                    match repo.record(server.id, &command.name, &remote_id, &hash).await {
                        Ok(_) => report.push(&command.name, outcome),
                        Err(e) => report.push(
                            &command.name,
                            CommandOutcome::Failed(format!("store: {}", e)),
                        ),
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        server = %server.platform_id,
                        command = %command.name,
                        "Failed to register remote command: {}",
                        e
                    );
                    report.push(&command.name, CommandOutcome::Failed(failure_reason(&e)));
                }
            }
        }

        Ok(report)
    }

    /// One remote call with a deadline, retried once immediately on failure.
    /// A second failure is deferred to the next reconcile pass.
    async fn attempt<T, F, Fut>(&self, call: F) -> Result<T, GatewayError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, GatewayError>>,
    {
        match self.bounded(call()).await {
            Ok(value) => Ok(value),
            Err(first) => {
                tracing::debug!("Gateway call failed, retrying once: {}", first);
                self.bounded(call()).await
            }
        }
    }

    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, GatewayError>>,
    ) -> Result<T, GatewayError> {
        match tokio::time::timeout(self.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::Timeout),
        }
    }
}
