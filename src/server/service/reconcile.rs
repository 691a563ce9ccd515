//! Reconciliation between stored commands and the remote registry.
//!
//! Sync pulls remote identifiers into matching local records and reports orphans without
//! deleting them. Deploy pushes the desired state (live, enabled commands) of one scope with
//! a single bulk replace, after removing remote entries that are no longer wanted. Both are
//! rate limited per application. There is no locking between concurrent deploys; the bulk
//! replace is idempotent and the last write wins.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::server::{
    data::command::CommandRepository,
    error::{registry::RegistryError, AppError},
    model::{
        command::{Command, CommandScope, DeploymentStatus},
        rate_limit::{RateLimitAction, RateLimitOverview},
        reconcile::{DeployReport, OrphanCommand, RemovedOrphan, RestoreOutcome, SyncReport},
    },
    registry::{CommandRegistry, RegisteredCommand},
    service::{cache::CommandCache, command::CommandService, rate_limit::RateLimiter},
};

/// Tracks how far a deploy got before failing.
#[derive(Default)]
struct DeployProgress {
    /// A remote delete or replace was issued.
    remote_mutated: bool,
    /// The bulk replace succeeded.
    replaced: bool,
}

pub struct ReconciliationService<'a> {
    db: &'a DatabaseConnection,
    cache: &'a CommandCache,
    registry: &'a dyn CommandRegistry,
}

impl<'a> ReconciliationService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        cache: &'a CommandCache,
        registry: &'a dyn CommandRegistry,
    ) -> Self {
        Self {
            db,
            cache,
            registry,
        }
    }

    /// Pulls the remote command list of a scope into local records.
    ///
    /// Every remote entry matching a live local command by name is copied onto it and the
    /// command is marked `synced`. Remote entries without a live counterpart are reported
    /// as orphans and left alone.
    ///
    /// # Returns
    /// - `Ok(SyncReport)` - Matched names and orphans
    /// - `Err(AppError::RateLimited)` - Sync quota exhausted
    /// - `Err(AppError::RegistryErr)` - The registry could not be read
    pub async fn sync(&self, scope: CommandScope) -> Result<SyncReport, AppError> {
        let application_id = self.registry.application_id().await?;
        let limiter = RateLimiter::new(self.db);
        limiter
            .enforce(RateLimitAction::Sync, &application_id)
            .await?;

        let remote = self.registry.list(scope).await?;
        limiter
            .increment(RateLimitAction::Sync, &application_id)
            .await;

        let repo = CommandRepository::new(self.db);
        let local: HashMap<String, Command> = repo
            .list_live_in_scope(scope)
            .await?
            .into_iter()
            .map(|command| (command.name.clone(), command))
            .collect();

        let synced_at = Utc::now();
        let mut matched = Vec::new();
        let mut orphans = Vec::new();

        for entry in remote {
            match local.get(&entry.name) {
                Some(command) => {
                    repo.mark_synced(command.id, &entry, synced_at).await?;
                    tracing::debug!("Synced {} in {} to remote {}", entry.name, scope, entry.id);
                    matched.push(entry.name);
                }
                None => {
                    tracing::debug!("Remote command {} in {} is an orphan", entry.name, scope);
                    orphans.push(OrphanCommand {
                        name: entry.name,
                        registry_id: entry.id,
                        description: entry.description,
                    });
                }
            }
        }

        self.cache.invalidate_all().await;

        tracing::info!(
            "Synced {}: {} matched, {} orphaned",
            scope,
            matched.len(),
            orphans.len()
        );

        Ok(SyncReport {
            scope,
            matched,
            orphans,
            synced_at,
        })
    }

    /// Pushes the desired command set of a scope to the registry.
    ///
    /// Failed commands are moved back to `pending` before the attempt starts. Removes
    /// remote entries that are not desired, clears the identifiers of disabled
    /// commands, then replaces the remote set in one call and writes the returned
    /// identifiers back. On failure every desired command that did not end up deployed is
    /// marked `failed` with the error message before the error is returned.
    ///
    /// # Returns
    /// - `Ok(DeployReport)` - Deployed, removed and cleared commands
    /// - `Err(AppError::RateLimited)` - Deploy quota exhausted
    /// - `Err(AppError::RegistryErr)` - The bulk replace failed
    pub async fn deploy(&self, scope: CommandScope) -> Result<DeployReport, AppError> {
        let application_id = self.registry.application_id().await?;
        let limiter = RateLimiter::new(self.db);
        limiter
            .enforce(RateLimitAction::Deploy, &application_id)
            .await?;

        let repo = CommandRepository::new(self.db);
        let retried = repo.reset_failed(scope).await?;
        if retried > 0 {
            tracing::debug!("Retrying {} failed commands in {}", retried, scope);
        }

        let (desired, disabled): (Vec<Command>, Vec<Command>) = repo
            .list_live_in_scope(scope)
            .await?
            .into_iter()
            .partition(|command| command.enabled);

        let mut progress = DeployProgress::default();
        let result = self
            .push(scope, &desired, &disabled, &mut progress)
            .await;

        if progress.remote_mutated {
            limiter
                .increment(RateLimitAction::Deploy, &application_id)
                .await;
        }

        if let Some(message) = result.as_ref().err().map(|err| err.to_string()) {
            tracing::warn!("Deploy to {} failed: {}", scope, message);
            self.record_failure(scope, progress.replaced, &message).await;
        }
        self.cache.invalidate_all().await;

        let report = result?;
        tracing::info!(
            "Deployed {} commands to {} ({} removed, {} disabled cleared)",
            report.deployed.len(),
            scope,
            report.removed_remote.len(),
            report.disabled_cleared.len()
        );

        Ok(report)
    }

    /// Deletes the remote command with the given name from a scope.
    ///
    /// Any local record, live or deleted, that still holds the removed identifier has it
    /// cleared.
    ///
    /// # Returns
    /// - `Ok(RemovedOrphan)` - The removed remote entry
    /// - `Err(AppError::NotFound)` - No remote command with that name in the scope
    /// - `Err(AppError::RegistryErr)` - The registry could not be read or the delete failed
    pub async fn remove_orphan(
        &self,
        name: &str,
        scope: CommandScope,
    ) -> Result<RemovedOrphan, AppError> {
        let remote = self.registry.list(scope).await?;
        let entry = remote
            .into_iter()
            .find(|entry| entry.name == name)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Command '{}' is not registered on Discord in {}",
                    name, scope
                ))
            })?;

        self.registry.delete(scope, &entry.id).await?;

        let repo = CommandRepository::new(self.db);
        repo.clear_registry_by_registry_id(&entry.id).await?;
        self.cache.invalidate_all().await;

        tracing::info!("Removed remote command {} ({}) from {}", name, entry.id, scope);

        Ok(RemovedOrphan {
            scope,
            name: entry.name,
            registry_id: entry.id,
        })
    }

    /// Deletes a stored command's remote registration and clears its identifier.
    ///
    /// Works for live commands and, when none is live, the most recently deleted one.
    ///
    /// # Returns
    /// - `Ok(Command)` - The command with its identifier cleared
    /// - `Err(AppError::NotFound)` - No such command, or it has no remote identifier
    /// - `Err(AppError::RegistryErr)` - The remote delete failed
    pub async fn remove_from_discord(
        &self,
        name: &str,
        scope: CommandScope,
    ) -> Result<Command, AppError> {
        let repo = CommandRepository::new(self.db);

        let command = match repo.find_live(name, scope).await? {
            Some(command) => command,
            None => repo.find_latest_deleted(name, scope).await?.ok_or_else(|| {
                AppError::NotFound(format!("Command '{}' not found in {}", name, scope))
            })?,
        };

        let registry_id = command.registry_id.clone().ok_or_else(|| {
            AppError::NotFound(format!(
                "Command '{}' in {} is not registered on Discord",
                name, scope
            ))
        })?;

        self.registry.delete(scope, &registry_id).await?;
        repo.clear_registry(command.id).await?;
        self.cache.invalidate_all().await;

        tracing::info!("Removed {} ({}) from Discord in {}", name, registry_id, scope);

        repo.find_by_id(command.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Command '{}' not found in {}", name, scope)))
    }

    /// Restores a soft-deleted command and redeploys its scope when it has no remote
    /// identifier.
    ///
    /// A failed redeploy is reported on the outcome; the restore itself stands.
    ///
    /// # Returns
    /// - `Ok(RestoreOutcome)` - Restored command and redeploy result
    /// - `Err(AppError::NotFound)` - No deleted command with that name in the scope
    /// - `Err(AppError::Conflict)` - A live command with the same name exists in the scope
    pub async fn restore(
        &self,
        name: &str,
        scope: CommandScope,
        restored_by: String,
    ) -> Result<RestoreOutcome, AppError> {
        let commands = CommandService::new(self.db, self.cache);
        let command = commands.restore(name, scope, restored_by).await?;

        if command.registry_id.is_some() {
            return Ok(RestoreOutcome {
                command,
                deployed_to_discord: false,
                deploy_error: None,
            });
        }

        let (deployed_to_discord, deploy_error) = match self.deploy(scope).await {
            Ok(_) => (true, None),
            Err(e) => {
                tracing::warn!("Redeploy after restoring {} in {} failed: {}", name, scope, e);
                (false, Some(e.to_string()))
            }
        };

        let repo = CommandRepository::new(self.db);
        let command = repo.find_by_id(command.id).await?.unwrap_or(command);

        Ok(RestoreOutcome {
            command,
            deployed_to_discord,
            deploy_error,
        })
    }

    /// Current quota state of sync and deploy plus every open counter.
    ///
    /// An unresolvable application ID is reported as `None` rather than failing, and an
    /// unreadable counter store yields bypassed actions with no counters.
    pub async fn rate_limit_overview(&self) -> Result<RateLimitOverview, AppError> {
        let application_id = match self.registry.application_id().await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("Could not resolve application ID for rate limits: {}", e);
                None
            }
        };

        let limiter = RateLimiter::new(self.db);
        let mut actions = Vec::new();
        if let Some(id) = application_id.as_deref() {
            for action in [RateLimitAction::Sync, RateLimitAction::Deploy] {
                actions.push((action, limiter.check(action, id).await));
            }
        }

        let counters = match limiter.active_counters().await {
            Ok(counters) => counters,
            Err(e) => {
                tracing::warn!("Could not load rate limit counters: {}", e);
                Vec::new()
            }
        };

        Ok(RateLimitOverview {
            application_id,
            actions,
            counters,
            now: Utc::now().timestamp(),
        })
    }

    async fn push(
        &self,
        scope: CommandScope,
        desired: &[Command],
        disabled: &[Command],
        progress: &mut DeployProgress,
    ) -> Result<DeployReport, AppError> {
        let repo = CommandRepository::new(self.db);

        let observed = match self.registry.list(scope).await {
            Ok(observed) => observed,
            Err(e) => {
                tracing::warn!("Could not list remote commands in {}, assuming none: {}", scope, e);
                Vec::new()
            }
        };

        let desired_names: HashSet<&str> =
            desired.iter().map(|command| command.name.as_str()).collect();
        let mut removed_remote = Vec::new();
        let mut removed_ids = HashSet::new();

        for entry in observed
            .iter()
            .filter(|entry| !desired_names.contains(entry.name.as_str()))
        {
            progress.remote_mutated = true;
            match self.registry.delete(scope, &entry.id).await {
                Ok(()) => {
                    tracing::debug!("Removed undesired remote {} from {}", entry.name, scope);
                    removed_ids.insert(entry.id.clone());
                    removed_remote.push(entry.name.clone());
                }
                Err(e) => {
                    tracing::warn!("Failed to remove remote {} from {}: {}", entry.name, scope, e)
                }
            }
        }

        let mut disabled_cleared = Vec::new();
        for command in disabled {
            let Some(registry_id) = command.registry_id.as_deref() else {
                continue;
            };

            if !removed_ids.contains(registry_id) {
                progress.remote_mutated = true;
                if let Err(e) = self.registry.delete(scope, registry_id).await {
                    tracing::warn!(
                        "Failed to remove disabled {} from {}: {}",
                        command.name,
                        scope,
                        e
                    );
                }
            }

            repo.clear_registry(command.id).await?;
            disabled_cleared.push(command.name.clone());
        }

        let payload = desired.iter().map(Command::to_payload).collect();
        progress.remote_mutated = true;
        let replaced = self.registry.replace_all(scope, payload).await?;
        progress.replaced = true;

        let deployed_at = Utc::now();
        let deployed = self.write_back(desired, &replaced, deployed_at).await?;

        let missing: Vec<&str> = desired
            .iter()
            .map(|command| command.name.as_str())
            .filter(|name| !deployed.iter().any(|(deployed, _)| deployed == name))
            .collect();
        if !missing.is_empty() {
            return Err(RegistryError::Rejected(format!(
                "Registry response is missing commands: {}",
                missing.join(", ")
            ))
            .into());
        }

        Ok(DeployReport {
            scope,
            deployed,
            removed_remote,
            disabled_cleared,
            deployed_at,
        })
    }

    /// Marks every desired command found in `remote` as deployed.
    async fn write_back(
        &self,
        desired: &[Command],
        remote: &[RegisteredCommand],
        deployed_at: chrono::DateTime<Utc>,
    ) -> Result<Vec<(String, String)>, AppError> {
        let repo = CommandRepository::new(self.db);
        let mut deployed = Vec::new();

        for entry in remote {
            if let Some(command) = desired.iter().find(|command| command.name == entry.name) {
                repo.mark_deployed(command.id, entry, deployed_at).await?;
                deployed.push((entry.name.clone(), entry.id.clone()));
            }
        }

        Ok(deployed)
    }

    /// Records a failed deploy on the desired commands of a scope.
    ///
    /// When the bulk replace went through, the remote list is fetched again and commands
    /// present remotely are written back as deployed. Every other live, enabled command
    /// that is not deployed is marked `failed`. Errors here are logged so the original
    /// deploy error is the one returned.
    async fn record_failure(&self, scope: CommandScope, replaced: bool, message: &str) {
        let repo = CommandRepository::new(self.db);

        let desired: Vec<Command> = match repo.list_live_in_scope(scope).await {
            Ok(commands) => commands.into_iter().filter(|c| c.enabled).collect(),
            Err(e) => {
                tracing::warn!("Could not load commands to record deploy failure: {}", e);
                return;
            }
        };

        let undeployed: Vec<Command> = desired
            .into_iter()
            .filter(|command| command.deployment_status != DeploymentStatus::Deployed)
            .collect();

        let mut deployed: HashSet<String> = HashSet::new();
        if replaced {
            match self.registry.list(scope).await {
                Ok(remote) => match self.write_back(&undeployed, &remote, Utc::now()).await {
                    Ok(written) => deployed.extend(written.into_iter().map(|(name, _)| name)),
                    Err(e) => tracing::warn!("Failed to write back deploy in {}: {}", scope, e),
                },
                Err(e) => tracing::warn!("Could not re-read remote commands in {}: {}", scope, e),
            }
        }

        let failed: Vec<i32> = undeployed
            .iter()
            .filter(|command| !deployed.contains(&command.name))
            .map(|command| command.id)
            .collect();

        if let Err(e) = repo.mark_failed(&failed, message).await {
            tracing::warn!("Failed to mark commands in {} as failed: {}", scope, e);
        }
    }
}
