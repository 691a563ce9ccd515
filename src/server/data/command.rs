//! Command data repository for database operations.
//!
//! This module provides the `CommandRepository` for managing command records. Commands are
//! soft deleted through a nullable `deleted_at` timestamp; "live" means `deleted_at IS NULL`.
//! Uniqueness of live (name, scope) pairs is enforced by a partial unique index, so inserts
//! and restores surface violations as `DbErr` for the service layer to map into conflicts.

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::{Expr, ExprTrait},
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder,
};

use crate::server::{
    model::command::{
        Command, CommandFilter, CommandScope, CreateCommandParam, DeploymentStatus,
        UpdateCommandParam,
    },
    registry::RegisteredCommand,
};

/// Repository providing database operations for command management.
pub struct CommandRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CommandRepository<'a> {
    /// Creates a new CommandRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `CommandRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a new live command with status `pending` and version 1.
    ///
    /// # Arguments
    /// - `param` - Validated create parameters
    ///
    /// # Returns
    /// - `Ok(Command)` - The created command
    /// - `Err(DbErr)` - Database error, including a unique violation when a live command with
    ///   the same name already exists in the scope
    pub async fn create(&self, param: CreateCommandParam) -> Result<Command, DbErr> {
        let now = Utc::now();

        let entity = entity::command::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(param.name),
            guild_id: ActiveValue::Set(param.scope.guild_id()),
            scope_key: ActiveValue::Set(param.scope.key()),
            description: ActiveValue::Set(param.description),
            options: ActiveValue::Set(options_json(&param.options)?),
            category: ActiveValue::Set(param.category.as_str().to_string()),
            enabled: ActiveValue::Set(param.enabled),
            default_member_permissions: ActiveValue::Set(param.default_member_permissions),
            dm_permission: ActiveValue::Set(param.dm_permission),
            version: ActiveValue::Set(1),
            registry_id: ActiveValue::Set(None),
            registry_application_id: ActiveValue::Set(None),
            registry_version: ActiveValue::Set(None),
            registry_type: ActiveValue::Set(None),
            deployment_status: ActiveValue::Set(DeploymentStatus::Pending.as_str().to_string()),
            deploy_count: ActiveValue::Set(0),
            last_error: ActiveValue::Set(None),
            last_deployed_at: ActiveValue::Set(None),
            last_synced_at: ActiveValue::Set(None),
            usage_count: ActiveValue::Set(0),
            last_used_at: ActiveValue::Set(None),
            usage_by_scope: ActiveValue::Set("{}".to_string()),
            created_by: ActiveValue::Set(param.created_by),
            updated_by: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            deleted_at: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await?;

        Command::from_entity(entity)
    }

    /// Finds a command by ID, live or deleted.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Command>, DbErr> {
        let entity = entity::prelude::Command::find_by_id(id).one(self.db).await?;

        entity.map(Command::from_entity).transpose()
    }

    /// Finds the live command with the given name in a scope.
    ///
    /// # Returns
    /// - `Ok(Some(Command))` - Live command found
    /// - `Ok(None)` - No live command with that name in the scope
    /// - `Err(DbErr)` - Database error
    pub async fn find_live(
        &self,
        name: &str,
        scope: CommandScope,
    ) -> Result<Option<Command>, DbErr> {
        let entity = entity::prelude::Command::find()
            .filter(entity::command::Column::Name.eq(name))
            .filter(entity::command::Column::ScopeKey.eq(scope.key()))
            .filter(entity::command::Column::DeletedAt.is_null())
            .one(self.db)
            .await?;

        entity.map(Command::from_entity).transpose()
    }

    /// Finds the most recently soft-deleted command with the given name in a scope.
    ///
    /// Several deleted records may share a name; the newest deletion wins.
    pub async fn find_latest_deleted(
        &self,
        name: &str,
        scope: CommandScope,
    ) -> Result<Option<Command>, DbErr> {
        let entity = entity::prelude::Command::find()
            .filter(entity::command::Column::Name.eq(name))
            .filter(entity::command::Column::ScopeKey.eq(scope.key()))
            .filter(entity::command::Column::DeletedAt.is_not_null())
            .order_by_desc(entity::command::Column::DeletedAt)
            .order_by_desc(entity::command::Column::Id)
            .one(self.db)
            .await?;

        entity.map(Command::from_entity).transpose()
    }

    /// Lists commands matching the filter, ordered by scope then name.
    ///
    /// # Arguments
    /// - `filter` - Category, enabled and scope filters; `deleted` switches from live to
    ///   soft-deleted records
    ///
    /// # Returns
    /// - `Ok(Vec<Command>)` - Matching commands
    /// - `Err(DbErr)` - Database error
    pub async fn list(&self, filter: &CommandFilter) -> Result<Vec<Command>, DbErr> {
        let mut query = entity::prelude::Command::find();

        query = if filter.deleted {
            query.filter(entity::command::Column::DeletedAt.is_not_null())
        } else {
            query.filter(entity::command::Column::DeletedAt.is_null())
        };

        if let Some(category) = filter.category {
            query = query.filter(entity::command::Column::Category.eq(category.as_str()));
        }
        if let Some(enabled) = filter.enabled {
            query = query.filter(entity::command::Column::Enabled.eq(enabled));
        }
        if let Some(scope) = filter.scope {
            query = query.filter(entity::command::Column::ScopeKey.eq(scope.key()));
        }

        let entities = query
            .order_by_asc(entity::command::Column::ScopeKey)
            .order_by_asc(entity::command::Column::Name)
            .order_by_asc(entity::command::Column::Id)
            .all(self.db)
            .await?;

        entities.into_iter().map(Command::from_entity).collect()
    }

    /// Lists every live command in a scope, enabled or not.
    pub async fn list_live_in_scope(&self, scope: CommandScope) -> Result<Vec<Command>, DbErr> {
        self.list(&CommandFilter {
            scope: Some(scope),
            ..Default::default()
        })
        .await
    }

    /// Returns every stored command including soft-deleted ones.
    pub async fn get_all(&self) -> Result<Vec<Command>, DbErr> {
        let entities = entity::prelude::Command::find()
            .order_by_asc(entity::command::Column::Id)
            .all(self.db)
            .await?;

        entities.into_iter().map(Command::from_entity).collect()
    }

    /// Merges the provided fields into a live command, bumps its version and marks it
    /// `outdated`.
    ///
    /// # Arguments
    /// - `id` - ID of the live command to update
    /// - `param` - Fields to merge; `None` keeps the stored value
    ///
    /// # Returns
    /// - `Ok(Some(Command))` - The updated command
    /// - `Ok(None)` - No live command with that ID
    /// - `Err(DbErr)` - Database error
    pub async fn update(
        &self,
        id: i32,
        param: UpdateCommandParam,
    ) -> Result<Option<Command>, DbErr> {
        let Some(entity) = self.find_live_entity(id).await? else {
            return Ok(None);
        };

        let version = entity.version;
        let mut active: entity::command::ActiveModel = entity.into();

        if let Some(description) = param.description {
            active.description = ActiveValue::Set(description);
        }
        if let Some(options) = param.options {
            active.options = ActiveValue::Set(options_json(&options)?);
        }
        if let Some(category) = param.category {
            active.category = ActiveValue::Set(category.as_str().to_string());
        }
        if let Some(enabled) = param.enabled {
            active.enabled = ActiveValue::Set(enabled);
        }
        if let Some(permissions) = param.default_member_permissions {
            active.default_member_permissions = ActiveValue::Set(permissions);
        }
        if let Some(dm_permission) = param.dm_permission {
            active.dm_permission = ActiveValue::Set(dm_permission);
        }

        active.version = ActiveValue::Set(version + 1);
        active.deployment_status =
            ActiveValue::Set(DeploymentStatus::Outdated.as_str().to_string());
        active.updated_by = ActiveValue::Set(Some(param.updated_by));
        active.updated_at = ActiveValue::Set(Utc::now());

        let entity = active.update(self.db).await?;

        Command::from_entity(entity).map(Some)
    }

    /// Flips a live command to the given enabled state, bumps its version and marks it
    /// `outdated`.
    ///
    /// # Returns
    /// - `Ok(Some(Command))` - The updated command
    /// - `Ok(None)` - No live command with that ID
    /// - `Err(DbErr)` - Database error
    pub async fn set_enabled(
        &self,
        id: i32,
        enabled: bool,
        updated_by: String,
    ) -> Result<Option<Command>, DbErr> {
        let Some(entity) = self.find_live_entity(id).await? else {
            return Ok(None);
        };

        let version = entity.version;
        let mut active: entity::command::ActiveModel = entity.into();
        active.enabled = ActiveValue::Set(enabled);
        active.version = ActiveValue::Set(version + 1);
        active.deployment_status =
            ActiveValue::Set(DeploymentStatus::Outdated.as_str().to_string());
        active.updated_by = ActiveValue::Set(Some(updated_by));
        active.updated_at = ActiveValue::Set(Utc::now());

        let entity = active.update(self.db).await?;

        Command::from_entity(entity).map(Some)
    }

    /// Soft deletes a live command. The remote identifier is left untouched.
    ///
    /// # Returns
    /// - `Ok(Some(Command))` - The deleted command
    /// - `Ok(None)` - No live command with that ID
    /// - `Err(DbErr)` - Database error
    pub async fn soft_delete(
        &self,
        id: i32,
        deleted_by: String,
    ) -> Result<Option<Command>, DbErr> {
        let Some(entity) = self.find_live_entity(id).await? else {
            return Ok(None);
        };

        let now = Utc::now();
        let mut active: entity::command::ActiveModel = entity.into();
        active.deleted_at = ActiveValue::Set(Some(now));
        active.updated_by = ActiveValue::Set(Some(deleted_by));
        active.updated_at = ActiveValue::Set(now);

        let entity = active.update(self.db).await?;

        Command::from_entity(entity).map(Some)
    }

    /// Clears `deleted_at` on a soft-deleted command and resets its status to `pending`.
    ///
    /// # Returns
    /// - `Ok(Some(Command))` - The restored command
    /// - `Ok(None)` - No soft-deleted command with that ID
    /// - `Err(DbErr)` - Database error, including a unique violation when a live command
    ///   with the same name was created in the meantime
    pub async fn restore(&self, id: i32, restored_by: String) -> Result<Option<Command>, DbErr> {
        let entity = entity::prelude::Command::find_by_id(id)
            .filter(entity::command::Column::DeletedAt.is_not_null())
            .one(self.db)
            .await?;
        let Some(entity) = entity else {
            return Ok(None);
        };

        let mut active: entity::command::ActiveModel = entity.into();
        active.deleted_at = ActiveValue::Set(None);
        active.deployment_status =
            ActiveValue::Set(DeploymentStatus::Pending.as_str().to_string());
        active.updated_by = ActiveValue::Set(Some(restored_by));
        active.updated_at = ActiveValue::Set(Utc::now());

        let entity = active.update(self.db).await?;

        Command::from_entity(entity).map(Some)
    }

    /// Records one invocation of a live command.
    ///
    /// Both the usage counter and the per-scope breakdown are incremented in a single
    /// update statement, so concurrent invocations never overwrite each other. Neither the
    /// version nor the deployment status change.
    ///
    /// # Arguments
    /// - `id` - ID of the invoked command
    /// - `invoked_in` - Guild ID the invocation happened in, `"dm"` for direct messages
    ///
    /// # Returns
    /// - `Ok(Some(Command))` - The command with updated counters
    /// - `Ok(None)` - No live command with that ID
    /// - `Err(DbErr)` - Database error
    pub async fn record_usage(&self, id: i32, invoked_in: &str) -> Result<Option<Command>, DbErr> {
        let path = format!("$.\"{}\"", invoked_in);

        let result = entity::prelude::Command::update_many()
            .filter(entity::command::Column::Id.eq(id))
            .filter(entity::command::Column::DeletedAt.is_null())
            .col_expr(
                entity::command::Column::UsageCount,
                Expr::col(entity::command::Column::UsageCount).add(1),
            )
            .col_expr(
                entity::command::Column::LastUsedAt,
                Expr::value(Some(Utc::now())),
            )
            .col_expr(
                entity::command::Column::UsageByScope,
                Expr::cust_with_values(
                    "json_set(usage_by_scope, ?, COALESCE(json_extract(usage_by_scope, ?), 0) + 1)",
                    [path.clone(), path],
                ),
            )
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        let entity = entity::prelude::Command::find_by_id(id).one(self.db).await?;

        entity.map(Command::from_entity).transpose()
    }

    /// Copies remote identifier and metadata onto a command and marks it `synced`.
    pub async fn mark_synced(
        &self,
        id: i32,
        remote: &RegisteredCommand,
        synced_at: DateTime<Utc>,
    ) -> Result<(), DbErr> {
        entity::prelude::Command::update_many()
            .filter(entity::command::Column::Id.eq(id))
            .col_expr(
                entity::command::Column::RegistryId,
                Expr::value(Some(remote.id.clone())),
            )
            .col_expr(
                entity::command::Column::RegistryApplicationId,
                Expr::value(Some(remote.application_id.clone())),
            )
            .col_expr(
                entity::command::Column::RegistryVersion,
                Expr::value(Some(remote.version.clone())),
            )
            .col_expr(
                entity::command::Column::RegistryType,
                Expr::value(Some(remote.kind as i32)),
            )
            .col_expr(
                entity::command::Column::DeploymentStatus,
                Expr::value(DeploymentStatus::Synced.as_str()),
            )
            .col_expr(
                entity::command::Column::LastSyncedAt,
                Expr::value(Some(synced_at)),
            )
            .col_expr(
                entity::command::Column::LastError,
                Expr::value(Option::<String>::None),
            )
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Writes back the identifier returned by a deploy, marks the command `deployed` and
    /// increments its deploy counter.
    pub async fn mark_deployed(
        &self,
        id: i32,
        remote: &RegisteredCommand,
        deployed_at: DateTime<Utc>,
    ) -> Result<(), DbErr> {
        entity::prelude::Command::update_many()
            .filter(entity::command::Column::Id.eq(id))
            .col_expr(
                entity::command::Column::RegistryId,
                Expr::value(Some(remote.id.clone())),
            )
            .col_expr(
                entity::command::Column::RegistryApplicationId,
                Expr::value(Some(remote.application_id.clone())),
            )
            .col_expr(
                entity::command::Column::RegistryVersion,
                Expr::value(Some(remote.version.clone())),
            )
            .col_expr(
                entity::command::Column::RegistryType,
                Expr::value(Some(remote.kind as i32)),
            )
            .col_expr(
                entity::command::Column::DeploymentStatus,
                Expr::value(DeploymentStatus::Deployed.as_str()),
            )
            .col_expr(
                entity::command::Column::DeployCount,
                Expr::col(entity::command::Column::DeployCount).add(1),
            )
            .col_expr(
                entity::command::Column::LastDeployedAt,
                Expr::value(Some(deployed_at)),
            )
            .col_expr(
                entity::command::Column::LastError,
                Expr::value(Option::<String>::None),
            )
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Clears the remote identifier of a command and resets it to `pending`.
    pub async fn clear_registry(&self, id: i32) -> Result<(), DbErr> {
        self.clear_registry_where(entity::command::Column::Id.eq(id))
            .await
            .map(|_| ())
    }

    /// Clears the remote identifier on every record (live or deleted) holding `registry_id`.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of records cleared
    /// - `Err(DbErr)` - Database error
    pub async fn clear_registry_by_registry_id(&self, registry_id: &str) -> Result<u64, DbErr> {
        self.clear_registry_where(entity::command::Column::RegistryId.eq(registry_id))
            .await
    }

    /// Marks the given commands `failed` and records the error message on each.
    pub async fn mark_failed(&self, ids: &[i32], message: &str) -> Result<(), DbErr> {
        if ids.is_empty() {
            return Ok(());
        }

        entity::prelude::Command::update_many()
            .filter(entity::command::Column::Id.is_in(ids.iter().copied()))
            .col_expr(
                entity::command::Column::DeploymentStatus,
                Expr::value(DeploymentStatus::Failed.as_str()),
            )
            .col_expr(
                entity::command::Column::LastError,
                Expr::value(Some(message.to_string())),
            )
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Moves the live, enabled `failed` commands of a scope back to `pending`.
    ///
    /// The last error stays recorded until the next successful deploy overwrites it.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of commands reset
    /// - `Err(DbErr)` - Database error
    pub async fn reset_failed(&self, scope: CommandScope) -> Result<u64, DbErr> {
        let result = entity::prelude::Command::update_many()
            .filter(entity::command::Column::ScopeKey.eq(scope.key()))
            .filter(entity::command::Column::DeletedAt.is_null())
            .filter(entity::command::Column::Enabled.eq(true))
            .filter(
                entity::command::Column::DeploymentStatus.eq(DeploymentStatus::Failed.as_str()),
            )
            .col_expr(
                entity::command::Column::DeploymentStatus,
                Expr::value(DeploymentStatus::Pending.as_str()),
            )
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn clear_registry_where(
        &self,
        condition: impl sea_orm::sea_query::IntoCondition,
    ) -> Result<u64, DbErr> {
        let result = entity::prelude::Command::update_many()
            .filter(condition)
            .col_expr(
                entity::command::Column::RegistryId,
                Expr::value(Option::<String>::None),
            )
            .col_expr(
                entity::command::Column::RegistryApplicationId,
                Expr::value(Option::<String>::None),
            )
            .col_expr(
                entity::command::Column::RegistryVersion,
                Expr::value(Option::<String>::None),
            )
            .col_expr(
                entity::command::Column::RegistryType,
                Expr::value(Option::<i32>::None),
            )
            .col_expr(
                entity::command::Column::DeploymentStatus,
                Expr::value(DeploymentStatus::Pending.as_str()),
            )
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn find_live_entity(&self, id: i32) -> Result<Option<entity::command::Model>, DbErr> {
        entity::prelude::Command::find_by_id(id)
            .filter(entity::command::Column::DeletedAt.is_null())
            .one(self.db)
            .await
    }
}

fn options_json(options: &[serde_json::Value]) -> Result<String, DbErr> {
    serde_json::to_string(options)
        .map_err(|e| DbErr::Custom(format!("Failed to serialize options: {}", e)))
}
