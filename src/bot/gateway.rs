//! `CommandGateway` backed by Discord's guild command endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{CommandId, CommandOptionType, CreateCommand, CreateCommandOption, GuildId};
use serenity::http::Http;

use crate::gateway::{CommandGateway, GatewayError};
use crate::model::command::{CommandDescriptor, ParamType};

pub struct SerenityGateway {
    http: Arc<Http>,
}

impl SerenityGateway {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

fn option_kind(param_type: ParamType) -> CommandOptionType {
    match param_type {
        ParamType::String => CommandOptionType::String,
        ParamType::Integer => CommandOptionType::Integer,
        ParamType::Boolean => CommandOptionType::Boolean,
        ParamType::User => CommandOptionType::User,
        ParamType::Channel => CommandOptionType::Channel,
    }
}

fn build_command(command: &CommandDescriptor) -> CreateCommand {
    let mut builder = CreateCommand::new(&command.name).description(&command.description);

    for param in &command.params {
        builder = builder.add_option(
            CreateCommandOption::new(
                option_kind(param.param_type),
                &param.name,
                &param.description,
            )
            .required(param.required),
        );
    }

    builder
}

/// Platform ids and remote ids travel as strings through the core; Discord
/// wants snowflakes. A non-numeric id can only come from corrupted store
/// data, surfaced as a remote error rather than a panic.
fn parse_guild_id(platform_id: &str) -> Result<GuildId, GatewayError> {
    platform_id
        .parse::<u64>()
        .map(GuildId::new)
        .map_err(|_| GatewayError::Remote(format!("Invalid platform id '{}'", platform_id)))
}

fn parse_command_id(remote_id: &str) -> Result<CommandId, GatewayError> {
    remote_id
        .parse::<u64>()
        .map(CommandId::new)
        .map_err(|_| GatewayError::Remote(format!("Invalid remote id '{}'", remote_id)))
}

fn remote_err(error: serenity::Error) -> GatewayError {
    GatewayError::Remote(error.to_string())
}

#[async_trait]
impl CommandGateway for SerenityGateway {
    async fn register_command(
        &self,
        platform_id: &str,
        command: &CommandDescriptor,
    ) -> Result<String, GatewayError> {
        let guild_id = parse_guild_id(platform_id)?;

        let created = guild_id
            .create_command(&self.http, build_command(command))
            .await
            .map_err(remote_err)?;

        Ok(created.id.get().to_string())
    }

    async fn update_command(
        &self,
        platform_id: &str,
        remote_id: &str,
        command: &CommandDescriptor,
    ) -> Result<String, GatewayError> {
        let guild_id = parse_guild_id(platform_id)?;
        let command_id = parse_command_id(remote_id)?;

        let updated = guild_id
            .edit_command(&self.http, command_id, build_command(command))
            .await
            .map_err(remote_err)?;

        Ok(updated.id.get().to_string())
    }

    async fn delete_command(
        &self,
        platform_id: &str,
        remote_id: &str,
    ) -> Result<(), GatewayError> {
        let guild_id = parse_guild_id(platform_id)?;
        let command_id = parse_command_id(remote_id)?;

        guild_id
            .delete_command(&self.http, command_id)
            .await
            .map_err(remote_err)
    }
}
