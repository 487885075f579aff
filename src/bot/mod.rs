//! Discord transport edge.
//!
//! Everything serenity-specific lives under this module: the event handler
//! that translates gateway callbacks into `GatewayEvent`s, the slash-command
//! replies, and the `CommandGateway` implementation backed by Discord's
//! command endpoints. The sync core never sees a serenity type.

pub mod commands;
pub mod gateway;

use sea_orm::DatabaseConnection;
use serenity::all::{
    ActivityData, Client, Context, CreateInteractionResponse, CreateInteractionResponseMessage,
    EventHandler, GatewayIntents, Guild, Interaction, PartialGuild, Ready, UnavailableGuild,
};
use serenity::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::gateway::GatewayEvent;
use crate::service::resolver::NameResolver;

/// Discord bot event handler
pub struct Handler {
    db: DatabaseConnection,
    resolver: Arc<NameResolver>,
    events: mpsc::Sender<GatewayEvent>,
}

impl Handler {
    pub fn new(
        db: DatabaseConnection,
        resolver: Arc<NameResolver>,
        events: mpsc::Sender<GatewayEvent>,
    ) -> Self {
        Self {
            db,
            resolver,
            events,
        }
    }

    async fn emit(&self, event: GatewayEvent) {
        if self.events.send(event).await.is_err() {
            tracing::error!("Sync coordinator dropped its event channel");
        }
    }

    /// Joins, startup availability, renames, and outage recoveries all take
    /// the same path into the sync core.
    async fn server_available(&self, platform_id: String, display_name: String) {
        self.emit(GatewayEvent::ServerAvailable {
            platform_id,
            display_name,
        })
        .await;
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        tracing::info!("{} is connected to Discord!", ready.user.name);

        ctx.set_activity(Some(ActivityData::custom("Routing commands by name")));

        // Membership snapshot: stored servers absent from this list left
        // while the process was down.
        let server_ids = ready
            .guilds
            .iter()
            .map(|guild| guild.id.get().to_string())
            .collect();
        self.emit(GatewayEvent::Connected { server_ids }).await;
    }

    /// Called when a guild becomes available or the bot joins a new guild
    async fn guild_create(&self, _ctx: Context, guild: Guild, _is_new: Option<bool>) {
        tracing::debug!(
            "Guild available: {} ({}) - member_count: {}",
            guild.name,
            guild.id.get(),
            guild.member_count
        );

        self.server_available(guild.id.get().to_string(), guild.name.clone())
            .await;
    }

    /// Called when a guild is updated. A rename flows through the same sync
    /// path as a join; the sync re-binds the new display name.
    async fn guild_update(
        &self,
        _ctx: Context,
        _old_data_if_available: Option<Guild>,
        new_data: PartialGuild,
    ) {
        self.server_available(new_data.id.get().to_string(), new_data.name.clone())
            .await;
    }

    /// Called when the bot is removed from a guild or the guild becomes
    /// unavailable
    async fn guild_delete(&self, _ctx: Context, incomplete: UnavailableGuild, _full: Option<Guild>) {
        // Outage, not an eviction. The guild comes back via guild_create.
        if incomplete.unavailable {
            tracing::debug!("Guild {} unavailable during outage", incomplete.id.get());
            return;
        }

        self.emit(GatewayEvent::ServerRemoved {
            platform_id: incomplete.id.get().to_string(),
        })
        .await;
    }

    /// Called when a user invokes a slash command
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        let content = commands::handle_command(&self.db, &self.resolver, &command).await;
        let response = CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new().content(content),
        );
        if let Err(e) = command.create_response(&ctx.http, response).await {
            tracing::error!("Failed to respond to interaction: {:?}", e);
        }

        if let Some(guild_id) = command.guild_id {
            self.emit(GatewayEvent::CommandInvoked {
                platform_id: guild_id.get().to_string(),
                command_name: command.data.name.clone(),
            })
            .await;
        }
    }
}

/// Builds the Discord client without starting it, so the caller can hand its
/// HTTP handle to the command gateway and alert sink first.
///
/// # Arguments
/// - `token` - Discord bot token
/// - `db` - Database connection shared with the sync core
/// - `resolver` - Name resolver used for slash-command replies
/// - `events` - Channel feeding the sync coordinator
///
/// # Returns
/// - `Ok(Client)` - Ready to `start()`, which blocks until shutdown
/// - `Err(AppError)` - Client construction failed
pub async fn build_client(
    token: &str,
    db: DatabaseConnection,
    resolver: Arc<NameResolver>,
    events: mpsc::Sender<GatewayEvent>,
) -> Result<Client, AppError> {
    let intents = GatewayIntents::GUILDS;

    let handler = Handler::new(db, resolver, events);

    let client = Client::builder(token, intents)
        .event_handler(handler)
        .await?;

    Ok(client)
}
