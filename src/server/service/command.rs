//! Command store operations.
//!
//! `CommandService` owns the local lifecycle of commands: creation, reads through the cache,
//! updates, toggling, soft delete and restore, and usage recording. It never talks to the
//! registry; pushing changes out is the reconciliation service's job.

use sea_orm::DatabaseConnection;

use crate::server::{
    data::command::CommandRepository,
    error::AppError,
    model::{
        command::{
            Command, CommandFilter, CommandScope, CommandStats, CreateCommandParam,
            UpdateCommandParam,
        },
        rate_limit::RateLimitAction,
    },
    service::{cache::CommandCache, rate_limit::RateLimiter},
};

/// Key recorded in the usage breakdown for invocations outside a guild.
pub const DIRECT_MESSAGE_USAGE_KEY: &str = "dm";

pub struct CommandService<'a> {
    db: &'a DatabaseConnection,
    cache: &'a CommandCache,
}

impl<'a> CommandService<'a> {
    pub fn new(db: &'a DatabaseConnection, cache: &'a CommandCache) -> Self {
        Self { db, cache }
    }

    /// Creates a new command in status `pending`.
    ///
    /// # Returns
    /// - `Ok(Command)` - The created command
    /// - `Err(AppError::Conflict)` - A live command with the same name exists in the scope
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn create(&self, param: CreateCommandParam) -> Result<Command, AppError> {
        let repo = CommandRepository::new(self.db);
        let conflict = conflict_message(&param.name, param.scope);

        let command = repo
            .create(param)
            .await
            .map_err(|e| AppError::from_unique_violation(e, conflict))?;

        self.cache.invalidate_all().await;

        tracing::info!(
            "Created command {} in {} by {}",
            command.name,
            command.scope,
            command.created_by
        );

        Ok(command)
    }

    /// Gets a live command by name, reading through the cache.
    ///
    /// # Returns
    /// - `Ok(Command)` - The live command
    /// - `Err(AppError::NotFound)` - No live command with that name in the scope
    pub async fn get_by_name(&self, name: &str, scope: CommandScope) -> Result<Command, AppError> {
        let key = format!("detail:{}:{}", scope.key(), name);
        if let Some(command) = self.cache.get::<Command>(&key).await {
            return Ok(command);
        }

        let command = self.find_live(name, scope).await?;
        self.cache.set(&key, &command).await;

        Ok(command)
    }

    /// Lists commands matching the filter, reading through the cache.
    pub async fn list(&self, filter: CommandFilter) -> Result<Vec<Command>, AppError> {
        let key = filter.cache_key();
        if let Some(commands) = self.cache.get::<Vec<Command>>(&key).await {
            return Ok(commands);
        }

        let repo = CommandRepository::new(self.db);
        let commands = repo.list(&filter).await?;
        self.cache.set(&key, &commands).await;

        Ok(commands)
    }

    /// Merges fields into a live command, bumping its version and marking it `outdated`.
    ///
    /// Rate limited per command under the `update` action. The attempt is only counted once
    /// the update has been stored.
    ///
    /// # Returns
    /// - `Ok(Command)` - The updated command
    /// - `Err(AppError::RateLimited)` - Update quota for this command is exhausted
    /// - `Err(AppError::NotFound)` - No live command with that name in the scope
    pub async fn update(&self, param: UpdateCommandParam) -> Result<Command, AppError> {
        let limiter = RateLimiter::new(self.db);
        let identifier = format!("{}:{}", param.scope.key(), param.name);
        limiter.enforce(RateLimitAction::Update, &identifier).await?;

        let existing = self.find_live(&param.name, param.scope).await?;

        let repo = CommandRepository::new(self.db);
        let command = repo
            .update(existing.id, param)
            .await?
            .ok_or_else(|| not_found(&existing.name, existing.scope))?;

        limiter.increment(RateLimitAction::Update, &identifier).await;
        self.cache.invalidate_all().await;

        tracing::info!(
            "Updated command {} in {} to version {}",
            command.name,
            command.scope,
            command.version
        );

        Ok(command)
    }

    /// Flips the enabled flag of a live command and marks it `outdated`.
    pub async fn toggle(
        &self,
        name: &str,
        scope: CommandScope,
        updated_by: String,
    ) -> Result<Command, AppError> {
        let existing = self.find_live(name, scope).await?;

        let repo = CommandRepository::new(self.db);
        let command = repo
            .set_enabled(existing.id, !existing.enabled, updated_by)
            .await?
            .ok_or_else(|| not_found(name, scope))?;

        self.cache.invalidate_all().await;

        tracing::info!(
            "Command {} in {} is now {}",
            command.name,
            command.scope,
            if command.enabled { "enabled" } else { "disabled" }
        );

        Ok(command)
    }

    /// Soft deletes a live command; its remote registration is left in place.
    ///
    /// # Returns
    /// - `Ok(Command)` - The deleted command
    /// - `Err(AppError::NotFound)` - No live command with that name in the scope
    pub async fn soft_delete(
        &self,
        name: &str,
        scope: CommandScope,
        deleted_by: String,
    ) -> Result<Command, AppError> {
        let existing = self.find_live(name, scope).await?;

        let repo = CommandRepository::new(self.db);
        let command = repo
            .soft_delete(existing.id, deleted_by)
            .await?
            .ok_or_else(|| not_found(name, scope))?;

        self.cache.invalidate_all().await;

        tracing::info!("Soft deleted command {} in {}", command.name, command.scope);

        Ok(command)
    }

    /// Restores the most recently deleted command with the given name.
    ///
    /// Resets the status to `pending` without bumping the version.
    ///
    /// # Returns
    /// - `Ok(Command)` - The restored command
    /// - `Err(AppError::NotFound)` - No deleted command with that name in the scope
    /// - `Err(AppError::Conflict)` - A live command with the same name exists in the scope
    pub async fn restore(
        &self,
        name: &str,
        scope: CommandScope,
        restored_by: String,
    ) -> Result<Command, AppError> {
        let repo = CommandRepository::new(self.db);

        let deleted = repo.find_latest_deleted(name, scope).await?.ok_or_else(|| {
            AppError::NotFound(format!("No deleted command '{}' in {}", name, scope))
        })?;

        let command = repo
            .restore(deleted.id, restored_by)
            .await
            .map_err(|e| AppError::from_unique_violation(e, conflict_message(name, scope)))?
            .ok_or_else(|| {
                AppError::NotFound(format!("No deleted command '{}' in {}", name, scope))
            })?;

        self.cache.invalidate_all().await;

        tracing::info!("Restored command {} in {}", command.name, command.scope);

        Ok(command)
    }

    /// Records one invocation of a live command.
    ///
    /// # Arguments
    /// - `name` - Invoked command name
    /// - `scope` - Scope the command is registered in
    /// - `invoked_guild_id` - Guild the invocation happened in, `None` for direct messages
    pub async fn record_usage(
        &self,
        name: &str,
        scope: CommandScope,
        invoked_guild_id: Option<&str>,
    ) -> Result<Command, AppError> {
        let existing = self.find_live(name, scope).await?;

        let repo = CommandRepository::new(self.db);
        let command = repo
            .record_usage(existing.id, invoked_guild_id.unwrap_or(DIRECT_MESSAGE_USAGE_KEY))
            .await?
            .ok_or_else(|| not_found(name, scope))?;

        self.cache.invalidate_all().await;

        tracing::debug!("Recorded usage of {} in {}", command.name, command.scope);

        Ok(command)
    }

    /// Aggregates counts over every stored command.
    pub async fn stats(&self) -> Result<CommandStats, AppError> {
        let repo = CommandRepository::new(self.db);
        let commands = repo.get_all().await?;

        Ok(CommandStats::from_commands(&commands))
    }

    async fn find_live(&self, name: &str, scope: CommandScope) -> Result<Command, AppError> {
        let repo = CommandRepository::new(self.db);

        repo.find_live(name, scope)
            .await?
            .ok_or_else(|| not_found(name, scope))
    }
}

fn not_found(name: &str, scope: CommandScope) -> AppError {
    AppError::NotFound(format!("Command '{}' not found in {}", name, scope))
}

fn conflict_message(name: &str, scope: CommandScope) -> String {
    format!("Command '{}' already exists in {}", name, scope)
}
