//! Stale-server resync sweep.
//!
//! Event-driven sync covers the normal lifecycle, but belief state can still
//! drift: a registration call that kept failing past the attempt cap, or
//! commands edited remotely while the process was down. The sweep re-kicks
//! any active server whose last clean sync is older than the configured
//! cutoff, or that never completed one.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::data::server::ServerRepository;
use crate::error::AppError;
use crate::sync::SyncCoordinator;

/// Starts the resync scheduler
///
/// Runs every five minutes and queues a fresh sync for each stale active
/// server. Queued resyncs go through the per-server actors, so a sweep can
/// never race a live gateway event for the same server.
///
/// # Arguments
/// - `db`: Database connection
/// - `coordinator`: Sync coordinator that receives the queued resyncs
/// - `stale_minutes`: Age after which a server counts as stale
pub async fn start_scheduler(
    db: DatabaseConnection,
    coordinator: Arc<SyncCoordinator>,
    stale_minutes: i64,
) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async("0 */5 * * * *", move |_uuid, _lock| {
        let db = db.clone();
        let coordinator = coordinator.clone();

        Box::pin(async move {
            if let Err(e) = sweep_stale(&db, &coordinator, stale_minutes).await {
                tracing::error!("Error running resync sweep: {}", e);
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!(stale_minutes, "Resync scheduler started");

    Ok(())
}

/// One sweep: find stale active servers and queue a resync for each.
async fn sweep_stale(
    db: &DatabaseConnection,
    coordinator: &SyncCoordinator,
    stale_minutes: i64,
) -> Result<(), AppError> {
    let cutoff = Utc::now() - chrono::Duration::minutes(stale_minutes);
    let stale = ServerRepository::new(db).list_stale(cutoff).await?;

    if stale.is_empty() {
        return Ok(());
    }

    tracing::info!(count = stale.len(), "Resync sweep found stale servers");

    for server in stale {
        tracing::debug!(
            server = %server.platform_id,
            last_sync = ?server.last_sync_at,
            "Queueing resync"
        );
        coordinator.resync(&server.platform_id, &server.name).await;
    }

    Ok(())
}
