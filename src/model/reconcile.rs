use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::command::CommandDto;

/// Optional body for sync/deploy requests; an empty body targets the global scope.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ScopeDto {
    #[serde(default)]
    pub guild_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RemoveOrphanDto {
    pub name: String,
    #[serde(default)]
    pub guild_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrphanCommandDto {
    pub name: String,
    pub registry_id: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SyncReportDto {
    pub success: bool,
    pub guild_id: Option<String>,
    pub matched: Vec<String>,
    pub orphans: Vec<OrphanCommandDto>,
    pub synced_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeployedCommandDto {
    pub name: String,
    pub registry_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeployReportDto {
    pub success: bool,
    pub guild_id: Option<String>,
    pub deployed: Vec<DeployedCommandDto>,
    /// Remote entries deleted because they are not part of the desired set.
    pub removed_remote: Vec<String>,
    /// Disabled commands whose remote identifier was cleared.
    pub disabled_cleared: Vec<String>,
    pub deployed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RemovedOrphanDto {
    pub success: bool,
    pub guild_id: Option<String>,
    pub name: String,
    pub registry_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RestoreResultDto {
    pub success: bool,
    pub command: CommandDto,
    pub restored: bool,
    pub deployed_to_discord: bool,
    pub deploy_error: Option<String>,
}
