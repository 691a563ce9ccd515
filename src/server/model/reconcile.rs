//! Results of reconciliation operations against the command registry.

use chrono::{DateTime, Utc};

use crate::{
    model::reconcile::{
        DeployReportDto, DeployedCommandDto, OrphanCommandDto, RemovedOrphanDto,
        RestoreResultDto, SyncReportDto,
    },
    server::model::command::{Command, CommandScope},
};

/// Remote command with no live local counterpart in the same scope.
#[derive(Debug, Clone, PartialEq)]
pub struct OrphanCommand {
    pub name: String,
    pub registry_id: String,
    pub description: String,
}

impl OrphanCommand {
    pub fn into_dto(self) -> OrphanCommandDto {
        OrphanCommandDto {
            name: self.name,
            registry_id: self.registry_id,
            description: self.description,
        }
    }
}

/// Outcome of pulling remote identifiers into local records.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub scope: CommandScope,
    /// Names of local commands that were matched to a remote entry.
    pub matched: Vec<String>,
    pub orphans: Vec<OrphanCommand>,
    pub synced_at: DateTime<Utc>,
}

impl SyncReport {
    pub fn into_dto(self) -> SyncReportDto {
        SyncReportDto {
            success: true,
            guild_id: self.scope.guild_id(),
            matched: self.matched,
            orphans: self.orphans.into_iter().map(OrphanCommand::into_dto).collect(),
            synced_at: self.synced_at,
        }
    }
}

/// Outcome of pushing the desired command set to the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployReport {
    pub scope: CommandScope,
    /// `(name, registry_id)` of every command now deployed.
    pub deployed: Vec<(String, String)>,
    /// Names of remote entries removed because they are not desired.
    pub removed_remote: Vec<String>,
    /// Names of disabled commands whose remote identifier was cleared.
    pub disabled_cleared: Vec<String>,
    pub deployed_at: DateTime<Utc>,
}

impl DeployReport {
    pub fn into_dto(self) -> DeployReportDto {
        DeployReportDto {
            success: true,
            guild_id: self.scope.guild_id(),
            deployed: self
                .deployed
                .into_iter()
                .map(|(name, registry_id)| DeployedCommandDto { name, registry_id })
                .collect(),
            removed_remote: self.removed_remote,
            disabled_cleared: self.disabled_cleared,
            deployed_at: self.deployed_at,
        }
    }
}

/// Remote entry deleted through an explicit orphan removal.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedOrphan {
    pub scope: CommandScope,
    pub name: String,
    pub registry_id: String,
}

impl RemovedOrphan {
    pub fn into_dto(self) -> RemovedOrphanDto {
        RemovedOrphanDto {
            success: true,
            guild_id: self.scope.guild_id(),
            name: self.name,
            registry_id: self.registry_id,
        }
    }
}

/// Outcome of restoring a soft-deleted command.
///
/// A failed redeploy does not undo the restore; the error is reported alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreOutcome {
    pub command: Command,
    pub deployed_to_discord: bool,
    pub deploy_error: Option<String>,
}

impl RestoreOutcome {
    pub fn into_dto(self) -> RestoreResultDto {
        RestoreResultDto {
            success: true,
            command: self.command.into_dto(),
            restored: true,
            deployed_to_discord: self.deployed_to_discord,
            deploy_error: self.deploy_error,
        }
    }
}
