//! The default slash-command set and its replies.
//!
//! Every server gets the same three commands seeded on first sync: `alias`
//! binds a name to the invoking server, `resolve` looks a name up, and
//! `status` reports sync health. Replies are plain content strings; internal
//! error detail never reaches end users, it goes to the log and the operator
//! alert channel instead.

use sea_orm::DatabaseConnection;
use serenity::all::CommandInteraction;

use crate::data::registration::RegistrationRepository;
use crate::data::server::ServerRepository;
use crate::error::{resolve::ResolveError, AppError};
use crate::model::command::{CommandDescriptor, ParamType};
use crate::model::name::Scope;
use crate::service::resolver::NameResolver;

const GENERIC_REPLY: &str = "Something went wrong.";

/// The command set seeded into every server on first sync.
pub fn default_commands() -> Vec<CommandDescriptor> {
    vec![
        CommandDescriptor::new("alias", "Bind a name to this server").param(
            "name",
            "The name to bind",
            ParamType::String,
            true,
        ),
        CommandDescriptor::new("resolve", "Look up which server a name points at").param(
            "name",
            "The name to look up",
            ParamType::String,
            true,
        ),
        CommandDescriptor::new("status", "Show this server's sync status"),
    ]
}

/// Produces the reply for one slash-command invocation.
pub async fn handle_command(
    db: &DatabaseConnection,
    resolver: &NameResolver,
    interaction: &CommandInteraction,
) -> String {
    let Some(guild_id) = interaction.guild_id else {
        return "This command only works inside a server.".to_string();
    };

    dispatch(
        db,
        resolver,
        &guild_id.get().to_string(),
        &interaction.data.name,
        string_option(interaction, "name"),
    )
    .await
}

fn string_option<'a>(interaction: &'a CommandInteraction, name: &str) -> Option<&'a str> {
    interaction
        .data
        .options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| option.value.as_str())
}

async fn dispatch(
    db: &DatabaseConnection,
    resolver: &NameResolver,
    platform_id: &str,
    command_name: &str,
    name_arg: Option<&str>,
) -> String {
    let server = match ServerRepository::new(db).find_by_platform_id(platform_id).await {
        Ok(Some(server)) => server,
        Ok(None) => {
            return "This server has not finished syncing yet. Try again shortly.".to_string();
        }
        Err(e) => {
            tracing::error!(server = %platform_id, "Failed to load server for command: {}", e);
            return GENERIC_REPLY.to_string();
        }
    };

    match command_name {
        "alias" => alias_reply(resolver, server.id, name_arg).await,
        "resolve" => resolve_reply(db, resolver, server.id, name_arg).await,
        "status" => status_reply(db, &server).await,
        other => {
            tracing::warn!(server = %platform_id, command = %other, "Unknown command invoked");
            GENERIC_REPLY.to_string()
        }
    }
}

async fn alias_reply(resolver: &NameResolver, server_id: i32, name_arg: Option<&str>) -> String {
    let Some(name) = name_arg else {
        return "Provide a name to bind.".to_string();
    };

    match resolver
        .register_name(server_id, name, Scope(server_id))
        .await
    {
        Ok(()) => format!("'{}' now points at this server.", name),
        Err(e) => {
            tracing::error!(server_id, name, "Failed to register alias: {}", e);
            GENERIC_REPLY.to_string()
        }
    }
}

async fn resolve_reply(
    db: &DatabaseConnection,
    resolver: &NameResolver,
    server_id: i32,
    name_arg: Option<&str>,
) -> String {
    let Some(name) = name_arg else {
        return "Provide a name to look up.".to_string();
    };

    let target_id = match resolver.resolve(name, Scope(server_id)).await {
        Ok(target_id) => target_id,
        Err(AppError::ResolveErr(ResolveError::NotFound { .. })) => {
            return format!("No server here is registered under '{}'.", name);
        }
        Err(e) => {
            tracing::error!(server_id, name, "Failed to resolve name: {}", e);
            return GENERIC_REPLY.to_string();
        }
    };

    match ServerRepository::new(db).get_by_id(target_id).await {
        Ok(Some(target)) => format!("'{}' points at {}.", name, target.name),
        Ok(None) => {
            tracing::error!(server_id, target_id, "Name binding points at a missing server row");
            GENERIC_REPLY.to_string()
        }
        Err(e) => {
            tracing::error!(server_id, target_id, "Failed to load resolve target: {}", e);
            GENERIC_REPLY.to_string()
        }
    }
}

async fn status_reply(db: &DatabaseConnection, server: &entity::server::Model) -> String {
    let registered = match RegistrationRepository::new(db)
        .list_for_server(server.id)
        .await
    {
        Ok(records) => records.len(),
        Err(e) => {
            tracing::error!(server_id = server.id, "Failed to load registrations: {}", e);
            return GENERIC_REPLY.to_string();
        }
    };

    let last_sync = match server.last_sync_at {
        Some(at) => at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "never".to_string(),
    };

    format!(
        "{} commands registered. Last clean sync: {}.",
        registered, last_sync
    )
}
