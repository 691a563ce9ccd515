use std::sync::Arc;

use async_trait::async_trait;
use serenity::{
    all::{ApplicationId, CommandId, GuildId},
    http::Http,
    model::application::Command,
};

use crate::server::{
    error::registry::RegistryError,
    model::command::CommandScope,
    registry::{CommandPayload, CommandRegistry, RegisteredCommand},
};

/// `CommandRegistry` backed by Discord's application command endpoints.
///
/// Shares the bot's `Http` client so the application ID learned from the gateway `ready`
/// event is visible here without another request.
pub struct DiscordRegistry {
    http: Arc<Http>,
}

impl DiscordRegistry {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    async fn resolve_application_id(&self) -> Result<ApplicationId, RegistryError> {
        if let Some(id) = self.http.application_id() {
            return Ok(id);
        }

        let info = self.http.get_current_application_info().await?;
        self.http.set_application_id(info.id);

        tracing::info!("Resolved Discord application ID {}", info.id);

        Ok(info.id)
    }
}

#[async_trait]
impl CommandRegistry for DiscordRegistry {
    async fn application_id(&self) -> Result<String, RegistryError> {
        Ok(self.resolve_application_id().await?.to_string())
    }

    async fn list(&self, scope: CommandScope) -> Result<Vec<RegisteredCommand>, RegistryError> {
        self.resolve_application_id().await?;

        let commands = match scope {
            CommandScope::Global => self.http.get_global_commands().await?,
            CommandScope::Guild(id) => self.http.get_guild_commands(guild_id(id)?).await?,
        };

        Ok(commands.into_iter().map(registered_command).collect())
    }

    async fn replace_all(
        &self,
        scope: CommandScope,
        commands: Vec<CommandPayload>,
    ) -> Result<Vec<RegisteredCommand>, RegistryError> {
        self.resolve_application_id().await?;

        let created = match scope {
            CommandScope::Global => self.http.create_global_commands(&commands).await?,
            CommandScope::Guild(id) => {
                self.http
                    .create_guild_commands(guild_id(id)?, &commands)
                    .await?
            }
        };

        Ok(created.into_iter().map(registered_command).collect())
    }

    async fn delete(&self, scope: CommandScope, registry_id: &str) -> Result<(), RegistryError> {
        self.resolve_application_id().await?;

        let command_id = registry_id
            .parse::<u64>()
            .ok()
            .filter(|id| *id != 0)
            .map(CommandId::new)
            .ok_or_else(|| RegistryError::InvalidId(registry_id.to_string()))?;

        match scope {
            CommandScope::Global => self.http.delete_global_command(command_id).await?,
            CommandScope::Guild(id) => {
                self.http
                    .delete_guild_command(guild_id(id)?, command_id)
                    .await?
            }
        }

        Ok(())
    }
}

fn guild_id(id: u64) -> Result<GuildId, RegistryError> {
    if id == 0 {
        return Err(RegistryError::InvalidId(id.to_string()));
    }
    Ok(GuildId::new(id))
}

fn registered_command(command: Command) -> RegisteredCommand {
    let options = command
        .options
        .iter()
        .filter_map(|option| match serde_json::to_value(option) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(
                    "Failed to serialize option of remote command {}: {}",
                    command.name,
                    e
                );
                None
            }
        })
        .collect();

    RegisteredCommand {
        id: command.id.to_string(),
        application_id: command.application_id.to_string(),
        kind: u8::from(command.kind),
        version: command.version.to_string(),
        default_member_permissions: command
            .default_member_permissions
            .map(|permissions| permissions.bits().to_string()),
        dm_permission: command.dm_permission,
        guild_id: command.guild_id.map(|id| id.to_string()),
        options,
        name: command.name,
        description: command.description,
    }
}
