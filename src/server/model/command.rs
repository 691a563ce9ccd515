//! Command domain models and parameters.
//!
//! Provides the `Command` domain model mirrored from the `command` table, the scope, category
//! and deployment status enums stored on it, and the parameter types for every store
//! operation. Validation of names, descriptions, categories and option schemas happens when
//! DTOs are converted into parameters, so the service layer only ever sees well-formed input.

use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, str::FromStr};

use crate::{
    model::command::{CommandDto, CreateCommandDto, ListCommandsQuery, UpdateCommandDto},
    server::{error::AppError, registry::CommandPayload},
};

/// Maximum length of a command name.
pub const MAX_NAME_LENGTH: usize = 32;

/// Maximum length of a command description.
pub const MAX_DESCRIPTION_LENGTH: usize = 100;

/// Maximum number of top-level options a slash command may declare.
pub const MAX_OPTIONS: usize = 25;

/// Scope key stored for global commands.
pub const GLOBAL_SCOPE_KEY: &str = "global";

/// Partition a command is registered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandScope {
    Global,
    Guild(u64),
}

impl CommandScope {
    /// Parses an optional guild ID from the API into a scope.
    ///
    /// # Arguments
    /// - `guild_id` - Guild ID string, `None` or blank for the global scope
    ///
    /// # Returns
    /// - `Ok(CommandScope)` - Parsed scope
    /// - `Err(AppError::Validation)` - Guild ID is not a valid snowflake
    pub fn from_guild_id(guild_id: Option<&str>) -> Result<Self, AppError> {
        match guild_id.map(str::trim).filter(|id| !id.is_empty()) {
            None => Ok(Self::Global),
            Some(id) => match id.parse::<u64>() {
                Ok(parsed) if parsed > 0 => Ok(Self::Guild(parsed)),
                _ => Err(AppError::Validation(format!("Invalid guild ID '{}'", id))),
            },
        }
    }

    /// Key used for the scope column and in cache keys.
    pub fn key(&self) -> String {
        match self {
            Self::Global => GLOBAL_SCOPE_KEY.to_string(),
            Self::Guild(id) => id.to_string(),
        }
    }

    /// Guild ID as stored in the nullable `guild_id` column.
    pub fn guild_id(&self) -> Option<String> {
        match self {
            Self::Global => None,
            Self::Guild(id) => Some(id.to_string()),
        }
    }

    fn from_column(guild_id: Option<&str>) -> Result<Self, DbErr> {
        match guild_id {
            None => Ok(Self::Global),
            Some(id) => id
                .parse::<u64>()
                .map(Self::Guild)
                .map_err(|e| DbErr::Custom(format!("Failed to parse guild_id '{}': {}", id, e))),
        }
    }
}

impl fmt::Display for CommandScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Guild(id) => write!(f, "guild {}", id),
        }
    }
}

/// Closed set of command categories shown in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandCategory {
    General,
    Utility,
    Fun,
    Moderation,
    Ai,
    Leveling,
    Admin,
}

impl CommandCategory {
    pub const ALL: [CommandCategory; 7] = [
        Self::General,
        Self::Utility,
        Self::Fun,
        Self::Moderation,
        Self::Ai,
        Self::Leveling,
        Self::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Utility => "utility",
            Self::Fun => "fun",
            Self::Moderation => "moderation",
            Self::Ai => "ai",
            Self::Leveling => "leveling",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for CommandCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value.trim().to_lowercase())
            .ok_or_else(|| {
                format!(
                    "Invalid category '{}'; expected one of: {}",
                    value,
                    Self::ALL.map(|c| c.as_str()).join(", ")
                )
            })
    }
}

/// Deployment state machine of a command.
///
/// `Pending -> Deployed -> Outdated -> Deployed`, `Pending|Outdated -> Failed -> Pending`.
/// `Synced` is only reached through a sync pull and falls back to `Outdated` on the next
/// local mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeploymentStatus {
    Pending,
    Deployed,
    Outdated,
    Failed,
    Synced,
}

impl DeploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Deployed => "deployed",
            Self::Outdated => "outdated",
            Self::Failed => "failed",
            Self::Synced => "synced",
        }
    }
}

impl FromStr for DeploymentStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "deployed" => Ok(Self::Deployed),
            "outdated" => Ok(Self::Outdated),
            "failed" => Ok(Self::Failed),
            "synced" => Ok(Self::Synced),
            other => Err(format!("Unknown deployment status '{}'", other)),
        }
    }
}

/// Usage counters maintained by the bot's command dispatcher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandUsage {
    /// Total number of invocations.
    pub count: u64,
    /// Time of the most recent invocation.
    pub last_used_at: Option<DateTime<Utc>>,
    /// Invocations keyed by the guild ID they happened in, `"dm"` for direct messages.
    pub by_scope: HashMap<String, u64>,
}

/// Command with full data from the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub id: i32,
    pub name: String,
    pub scope: CommandScope,
    pub description: String,
    /// Argument schema in Discord's wire shape; opaque to the reconciliation engine.
    pub options: Vec<serde_json::Value>,
    pub category: CommandCategory,
    pub enabled: bool,
    /// Permission bitfield serialized as a decimal string.
    pub default_member_permissions: Option<String>,
    pub dm_permission: bool,
    pub version: i32,
    pub registry_id: Option<String>,
    pub registry_application_id: Option<String>,
    pub registry_version: Option<String>,
    pub registry_type: Option<i32>,
    pub deployment_status: DeploymentStatus,
    pub deploy_count: i32,
    pub last_error: Option<String>,
    pub last_deployed_at: Option<DateTime<Utc>>,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub usage: CommandUsage,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Command {
    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The command entity from the database
    ///
    /// # Returns
    /// - `Ok(Command)` - Successfully converted domain model
    /// - `Err(DbErr::Custom)` - A stored enum, ID or JSON column could not be parsed
    pub fn from_entity(entity: entity::command::Model) -> Result<Self, DbErr> {
        let scope = CommandScope::from_column(entity.guild_id.as_deref())?;
        let category = entity
            .category
            .parse::<CommandCategory>()
            .map_err(DbErr::Custom)?;
        let deployment_status = entity
            .deployment_status
            .parse::<DeploymentStatus>()
            .map_err(DbErr::Custom)?;
        let options: Vec<serde_json::Value> = serde_json::from_str(&entity.options)
            .map_err(|e| DbErr::Custom(format!("Failed to parse options JSON: {}", e)))?;
        let by_scope: HashMap<String, u64> = serde_json::from_str(&entity.usage_by_scope)
            .map_err(|e| DbErr::Custom(format!("Failed to parse usage_by_scope JSON: {}", e)))?;

        Ok(Self {
            id: entity.id,
            name: entity.name,
            scope,
            description: entity.description,
            options,
            category,
            enabled: entity.enabled,
            default_member_permissions: entity.default_member_permissions,
            dm_permission: entity.dm_permission,
            version: entity.version,
            registry_id: entity.registry_id,
            registry_application_id: entity.registry_application_id,
            registry_version: entity.registry_version,
            registry_type: entity.registry_type,
            deployment_status,
            deploy_count: entity.deploy_count,
            last_error: entity.last_error,
            last_deployed_at: entity.last_deployed_at,
            last_synced_at: entity.last_synced_at,
            usage: CommandUsage {
                count: entity.usage_count.max(0) as u64,
                last_used_at: entity.last_used_at,
                by_scope,
            },
            created_by: entity.created_by,
            updated_by: entity.updated_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            deleted_at: entity.deleted_at,
        })
    }

    /// Serializes the command into the registry's wire shape for a bulk replace.
    pub fn to_payload(&self) -> CommandPayload {
        CommandPayload {
            kind: CommandPayload::CHAT_INPUT,
            name: self.name.clone(),
            description: self.description.clone(),
            options: self.options.clone(),
            default_member_permissions: self.default_member_permissions.clone(),
            dm_permission: self.dm_permission,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Converts the command to a DTO for API responses.
    pub fn into_dto(self) -> CommandDto {
        CommandDto {
            id: self.id,
            name: self.name,
            guild_id: self.scope.guild_id(),
            description: self.description,
            options: self.options,
            category: self.category.as_str().to_string(),
            enabled: self.enabled,
            default_member_permissions: self.default_member_permissions,
            dm_permission: self.dm_permission,
            version: self.version,
            registry_id: self.registry_id,
            registry_application_id: self.registry_application_id,
            registry_version: self.registry_version,
            deployment_status: self.deployment_status.as_str().to_string(),
            deploy_count: self.deploy_count,
            last_error: self.last_error,
            last_deployed_at: self.last_deployed_at,
            last_synced_at: self.last_synced_at,
            usage_count: self.usage.count,
            last_used_at: self.usage.last_used_at,
            usage_by_scope: self.usage.by_scope,
            created_by: self.created_by,
            updated_by: self.updated_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        }
    }
}

/// Parameters for creating a new command.
#[derive(Debug, Clone)]
pub struct CreateCommandParam {
    pub name: String,
    pub scope: CommandScope,
    pub description: String,
    pub options: Vec<serde_json::Value>,
    pub category: CommandCategory,
    pub enabled: bool,
    pub default_member_permissions: Option<String>,
    pub dm_permission: bool,
    /// Operator recorded as `created_by`.
    pub created_by: String,
}

impl CreateCommandParam {
    /// Validates a create DTO and converts it into parameters.
    ///
    /// # Arguments
    /// - `dto` - Request payload
    /// - `created_by` - Operator performing the request
    ///
    /// # Returns
    /// - `Ok(CreateCommandParam)` - Validated parameters
    /// - `Err(AppError::Validation)` - Name, description, category, scope, options or
    ///   permissions are malformed
    pub fn from_dto(dto: CreateCommandDto, created_by: String) -> Result<Self, AppError> {
        Ok(Self {
            name: validate_name(&dto.name)?,
            scope: CommandScope::from_guild_id(dto.guild_id.as_deref())?,
            description: validate_description(&dto.description)?,
            options: validate_options(dto.options.unwrap_or_default())?,
            category: parse_category(&dto.category)?,
            enabled: dto.enabled.unwrap_or(true),
            default_member_permissions: validate_permissions(dto.default_member_permissions)?,
            dm_permission: dto.dm_permission.unwrap_or(true),
            created_by,
        })
    }
}

/// Parameters for updating a live command; `None` fields keep their stored value.
#[derive(Debug, Clone)]
pub struct UpdateCommandParam {
    pub name: String,
    pub scope: CommandScope,
    pub description: Option<String>,
    pub options: Option<Vec<serde_json::Value>>,
    pub category: Option<CommandCategory>,
    pub enabled: Option<bool>,
    /// `Some(None)` clears the stored permissions.
    pub default_member_permissions: Option<Option<String>>,
    pub dm_permission: Option<bool>,
    /// Operator recorded as `updated_by`.
    pub updated_by: String,
}

impl UpdateCommandParam {
    /// Validates an update DTO and converts it into parameters.
    ///
    /// # Arguments
    /// - `name` - Name of the command from the request path
    /// - `scope` - Scope of the command
    /// - `dto` - Partial update payload
    /// - `updated_by` - Operator performing the request
    ///
    /// # Returns
    /// - `Ok(UpdateCommandParam)` - Validated parameters
    /// - `Err(AppError::Validation)` - A provided field is malformed
    pub fn from_dto(
        name: String,
        scope: CommandScope,
        dto: UpdateCommandDto,
        updated_by: String,
    ) -> Result<Self, AppError> {
        Ok(Self {
            name,
            scope,
            description: dto
                .description
                .as_deref()
                .map(validate_description)
                .transpose()?,
            options: dto.options.map(validate_options).transpose()?,
            category: dto.category.as_deref().map(parse_category).transpose()?,
            enabled: dto.enabled,
            default_member_permissions: dto
                .default_member_permissions
                .map(|value| validate_permissions(Some(value)))
                .transpose()?,
            dm_permission: dto.dm_permission,
            updated_by,
        })
    }
}

/// Filters for listing commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandFilter {
    pub category: Option<CommandCategory>,
    pub enabled: Option<bool>,
    /// `None` lists every scope.
    pub scope: Option<CommandScope>,
    /// Return soft-deleted commands instead of live ones.
    pub deleted: bool,
}

impl CommandFilter {
    /// Converts list query parameters into a filter.
    ///
    /// # Returns
    /// - `Ok(CommandFilter)` - Parsed filter
    /// - `Err(AppError::Validation)` - Unknown category or malformed guild ID
    pub fn from_query(query: ListCommandsQuery) -> Result<Self, AppError> {
        Ok(Self {
            category: query.category.as_deref().map(parse_category).transpose()?,
            enabled: query.enabled,
            scope: match query.guild_id.as_deref() {
                Some(id) if !id.trim().is_empty() => {
                    Some(CommandScope::from_guild_id(Some(id))?)
                }
                _ => None,
            },
            deleted: query.deleted,
        })
    }

    /// Cache key for this query shape.
    pub fn cache_key(&self) -> String {
        format!(
            "list:{}:{}:{}:{}",
            self.category.map(|c| c.as_str()).unwrap_or("*"),
            self.enabled.map(|e| e.to_string()).unwrap_or_else(|| "*".to_string()),
            self.scope.map(|s| s.key()).unwrap_or_else(|| "*".to_string()),
            self.deleted
        )
    }
}

/// Aggregated counts over every stored command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandStats {
    pub total: u64,
    pub enabled: u64,
    pub disabled: u64,
    pub deleted: u64,
    pub by_status: HashMap<DeploymentStatus, u64>,
    pub by_category: HashMap<CommandCategory, u64>,
    pub total_usage: u64,
}

impl CommandStats {
    /// Aggregates statistics; live counts exclude soft-deleted commands.
    pub fn from_commands(commands: &[Command]) -> Self {
        let mut stats = Self::default();

        for command in commands {
            stats.total_usage += command.usage.count;

            if command.is_deleted() {
                stats.deleted += 1;
                continue;
            }

            stats.total += 1;
            if command.enabled {
                stats.enabled += 1;
            } else {
                stats.disabled += 1;
            }
            *stats.by_status.entry(command.deployment_status).or_default() += 1;
            *stats.by_category.entry(command.category).or_default() += 1;
        }

        stats
    }

    pub fn into_dto(self) -> crate::model::command::CommandStatsDto {
        crate::model::command::CommandStatsDto {
            total: self.total,
            enabled: self.enabled,
            disabled: self.disabled,
            deleted: self.deleted,
            by_status: self
                .by_status
                .into_iter()
                .map(|(status, count)| (status.as_str().to_string(), count))
                .collect(),
            by_category: self
                .by_category
                .into_iter()
                .map(|(category, count)| (category.as_str().to_string(), count))
                .collect(),
            total_usage: self.total_usage,
        }
    }
}

/// Validates a command name: lowercase letters, digits, `-` and `_`, 1-32 characters.
pub fn validate_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();

    if name.is_empty() || name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::Validation(format!(
            "Command name must be between 1 and {} characters",
            MAX_NAME_LENGTH
        )));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(AppError::Validation(format!(
            "Command name '{}' may only contain lowercase letters, digits, '-' and '_'",
            name
        )));
    }

    Ok(name.to_string())
}

fn validate_description(description: &str) -> Result<String, AppError> {
    let description = description.trim();
    let length = description.chars().count();

    if length == 0 || length > MAX_DESCRIPTION_LENGTH {
        return Err(AppError::Validation(format!(
            "Command description must be between 1 and {} characters",
            MAX_DESCRIPTION_LENGTH
        )));
    }

    Ok(description.to_string())
}

fn validate_options(options: Vec<serde_json::Value>) -> Result<Vec<serde_json::Value>, AppError> {
    if options.len() > MAX_OPTIONS {
        return Err(AppError::Validation(format!(
            "Commands may declare at most {} options",
            MAX_OPTIONS
        )));
    }

    if let Some(position) = options.iter().position(|option| !option.is_object()) {
        return Err(AppError::Validation(format!(
            "Option at position {} must be an object",
            position
        )));
    }

    Ok(options)
}

fn validate_permissions(permissions: Option<String>) -> Result<Option<String>, AppError> {
    match permissions.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(bits) if bits.parse::<u64>().is_ok() => Ok(Some(bits.to_string())),
        Some(bits) => Err(AppError::Validation(format!(
            "default_member_permissions must be a permission bitfield, got '{}'",
            bits
        ))),
    }
}

fn parse_category(category: &str) -> Result<CommandCategory, AppError> {
    category.parse::<CommandCategory>().map_err(AppError::Validation)
}
