//! Remote command registry abstraction.
//!
//! The reconciliation engine talks to Discord's application command endpoints only through
//! the `CommandRegistry` trait. `DiscordRegistry` implements it over serenity's HTTP client;
//! tests use an in-memory fake that records calls and can be told to fail.

pub mod discord;


use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::server::{error::registry::RegistryError, model::command::CommandScope};

pub use discord::DiscordRegistry;

/// Command as reported by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredCommand {
    /// Remote command snowflake.
    pub id: String,
    pub application_id: String,
    pub name: String,
    pub description: String,
    /// Discord command type, `1` for slash commands.
    pub kind: u8,
    /// Remote version snowflake, changes on every update.
    pub version: String,
    pub options: Vec<serde_json::Value>,
    pub default_member_permissions: Option<String>,
    pub dm_permission: Option<bool>,
    pub guild_id: Option<String>,
}

/// Command definition in Discord's create/overwrite wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandPayload {
    #[serde(rename = "type")]
    pub kind: u8,
    pub name: String,
    pub description: String,
    pub options: Vec<serde_json::Value>,
    pub default_member_permissions: Option<String>,
    pub dm_permission: bool,
}

impl CommandPayload {
    /// Command type of slash commands.
    pub const CHAT_INPUT: u8 = 1;
}

/// Remote store of application commands, partitioned by scope.
#[async_trait]
pub trait CommandRegistry: Send + Sync {
    /// Application the commands are registered under; used as the rate limit identifier.
    async fn application_id(&self) -> Result<String, RegistryError>;

    /// Lists every command registered in the scope.
    async fn list(&self, scope: CommandScope) -> Result<Vec<RegisteredCommand>, RegistryError>;

    /// Atomically replaces the scope's command set with `commands`.
    ///
    /// Entries whose name already exists keep their remote ID; entries absent from
    /// `commands` are removed. Returns the resulting remote set.
    async fn replace_all(
        &self,
        scope: CommandScope,
        commands: Vec<CommandPayload>,
    ) -> Result<Vec<RegisteredCommand>, RegistryError>;

    /// Deletes a single command by remote ID.
    async fn delete(&self, scope: CommandScope, registry_id: &str) -> Result<(), RegistryError>;
}
