//! Multi-server command and state synchronization bot.
//!
//! One process serves every Discord server the bot is a member of. Gateway
//! events flow from the serenity handler into the sync coordinator, which
//! keeps each server's slash commands and name bindings reconciled against
//! the durable store.

mod alert;
mod bot;
mod config;
mod data;
mod error;
mod gateway;
mod model;
mod scheduler;
mod service;
mod startup;
mod sync;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::alert::{AlertSink, DiscordAlertSink, TracingAlertSink};
use crate::bot::gateway::SerenityGateway;
use crate::config::Config;
use crate::error::AppError;
use crate::service::resolver::NameResolver;
use crate::sync::{SyncCoordinator, SyncSettings};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Config::from_env()?;
    let db = startup::connect_to_database(&config).await?;

    let resolver = Arc::new(NameResolver::new(db.clone()));
    let (event_tx, event_rx) = mpsc::channel(256);

    let mut client = bot::build_client(
        &config.discord_bot_token,
        db.clone(),
        resolver.clone(),
        event_tx,
    )
    .await?;

    // The client's HTTP handle doubles as the outbound registration channel
    // and the alert delivery channel.
    let http = client.http.clone();
    let alerts: Arc<dyn AlertSink> = match config.operator_channel_id {
        Some(channel_id) => Arc::new(DiscordAlertSink::new(http.clone(), channel_id)),
        None => Arc::new(TracingAlertSink),
    };

    let coordinator = Arc::new(SyncCoordinator::new(
        db.clone(),
        Arc::new(SerenityGateway::new(http)),
        resolver,
        alerts,
        SyncSettings {
            call_timeout: config.gateway_call_timeout,
            max_attempts: config.sync_max_attempts,
            backoff_base: config.sync_backoff_base,
        },
    ));

    tokio::spawn(coordinator.clone().run(event_rx));

    scheduler::resync::start_scheduler(db, coordinator, config.resync_stale_minutes).await?;

    tracing::info!("Starting Discord bot...");

    // Blocks until shutdown.
    client.start().await?;

    Ok(())
}
