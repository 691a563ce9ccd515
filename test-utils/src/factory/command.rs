//! Command factory for creating test command entities.
//!
//! Inserts rows directly through the entity model so tests can set up states (deployed,
//! soft-deleted, disabled) without going through the service layer.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test commands with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::command::CommandFactory;
///
/// let command = CommandFactory::new(&db)
///     .name("ping")
///     .registry_id("1100")
///     .deployment_status("deployed")
///     .build()
///     .await?;
/// ```
pub struct CommandFactory<'a> {
    db: &'a DatabaseConnection,
    name: String,
    guild_id: Option<String>,
    description: String,
    options: String,
    category: String,
    enabled: bool,
    registry_id: Option<String>,
    deployment_status: String,
    deleted_at: Option<DateTime<Utc>>,
}

impl<'a> CommandFactory<'a> {
    /// Creates a new CommandFactory with default values.
    ///
    /// Defaults:
    /// - name: `"command_{id}"` where id is auto-incremented
    /// - scope: global
    /// - description: `"Test command {id}"`
    /// - category: `"general"`
    /// - enabled: `true`
    /// - deployment_status: `"pending"`
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    ///
    /// # Returns
    /// - `CommandFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            name: format!("command_{}", id),
            guild_id: None,
            description: format!("Test command {}", id),
            options: "[]".to_string(),
            category: "general".to_string(),
            enabled: true,
            registry_id: None,
            deployment_status: "pending".to_string(),
            deleted_at: None,
        }
    }

    /// Sets the command name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Scopes the command to a guild instead of the global scope.
    pub fn guild_id(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = Some(guild_id.into());
        self
    }

    /// Sets the command description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the category string stored on the row.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets whether the command is enabled.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Marks the command as already registered remotely under `registry_id`.
    pub fn registry_id(mut self, registry_id: impl Into<String>) -> Self {
        self.registry_id = Some(registry_id.into());
        self
    }

    /// Sets the raw deployment status string.
    pub fn deployment_status(mut self, status: impl Into<String>) -> Self {
        self.deployment_status = status.into();
        self
    }

    /// Soft-deletes the command at creation time.
    pub fn deleted(mut self) -> Self {
        self.deleted_at = Some(Utc::now());
        self
    }

    /// Builds and inserts the command entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::command::Model)` - Created command entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::command::Model, DbErr> {
        let now = Utc::now();
        let scope_key = self
            .guild_id
            .clone()
            .unwrap_or_else(|| "global".to_string());

        entity::command::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(self.name),
            guild_id: ActiveValue::Set(self.guild_id),
            scope_key: ActiveValue::Set(scope_key),
            description: ActiveValue::Set(self.description),
            options: ActiveValue::Set(self.options),
            category: ActiveValue::Set(self.category),
            enabled: ActiveValue::Set(self.enabled),
            default_member_permissions: ActiveValue::Set(None),
            dm_permission: ActiveValue::Set(true),
            version: ActiveValue::Set(1),
            registry_application_id: ActiveValue::Set(
                self.registry_id.as_ref().map(|_| "42".to_string()),
            ),
            registry_id: ActiveValue::Set(self.registry_id),
            registry_version: ActiveValue::Set(None),
            registry_type: ActiveValue::Set(None),
            deployment_status: ActiveValue::Set(self.deployment_status),
            deploy_count: ActiveValue::Set(0),
            last_error: ActiveValue::Set(None),
            last_deployed_at: ActiveValue::Set(None),
            last_synced_at: ActiveValue::Set(None),
            usage_count: ActiveValue::Set(0),
            last_used_at: ActiveValue::Set(None),
            usage_by_scope: ActiveValue::Set("{}".to_string()),
            created_by: ActiveValue::Set("test".to_string()),
            updated_by: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            deleted_at: ActiveValue::Set(self.deleted_at),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a global, enabled command with default values.
///
/// Shorthand for `CommandFactory::new(db).build().await`.
pub async fn create_command(db: &DatabaseConnection) -> Result<entity::command::Model, DbErr> {
    CommandFactory::new(db).build().await
}

/// Creates a global, enabled command with the given name.
pub async fn create_named_command(
    db: &DatabaseConnection,
    name: impl Into<String>,
) -> Result<entity::command::Model, DbErr> {
    CommandFactory::new(db).name(name).build().await
}
