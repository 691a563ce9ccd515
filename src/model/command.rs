use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CommandDto {
    pub id: i32,
    pub name: String,
    /// Guild the command is registered in, `null` for global commands.
    pub guild_id: Option<String>,
    pub description: String,
    #[schema(value_type = Vec<Object>)]
    pub options: Vec<serde_json::Value>,
    pub category: String,
    pub enabled: bool,
    pub default_member_permissions: Option<String>,
    pub dm_permission: bool,
    pub version: i32,
    pub registry_id: Option<String>,
    pub registry_application_id: Option<String>,
    pub registry_version: Option<String>,
    pub deployment_status: String,
    pub deploy_count: i32,
    pub last_error: Option<String>,
    pub last_deployed_at: Option<DateTime<Utc>>,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub usage_count: u64,
    pub last_used_at: Option<DateTime<Utc>>,
    pub usage_by_scope: HashMap<String, u64>,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCommandDto {
    pub name: String,
    #[serde(default)]
    pub guild_id: Option<String>,
    pub description: String,
    #[serde(default)]
    #[schema(value_type = Option<Vec<Object>>)]
    pub options: Option<Vec<serde_json::Value>>,
    pub category: String,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub default_member_permissions: Option<String>,
    #[serde(default)]
    pub dm_permission: Option<bool>,
}

/// Partial update; omitted fields keep their stored value.
///
/// `default_member_permissions` set to an empty string clears the stored permissions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateCommandDto {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<Vec<Object>>)]
    pub options: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub default_member_permissions: Option<String>,
    #[serde(default)]
    pub dm_permission: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCommandsQuery {
    pub category: Option<String>,
    pub enabled: Option<bool>,
    pub guild_id: Option<String>,
    /// When `true`, only soft-deleted commands are returned.
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScopeQuery {
    pub guild_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RecordUsageDto {
    /// Guild the invoked command is registered in, `null` for global commands.
    #[serde(default)]
    pub guild_id: Option<String>,
    /// Guild the invocation happened in, `null` for direct messages.
    #[serde(default)]
    pub invoked_guild_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CommandStatsDto {
    pub total: u64,
    pub enabled: u64,
    pub disabled: u64,
    pub deleted: u64,
    pub by_status: BTreeMap<String, u64>,
    pub by_category: BTreeMap<String, u64>,
    pub total_usage: u64,
}
