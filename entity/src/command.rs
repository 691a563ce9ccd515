use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "command")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub guild_id: Option<String>,
    /// `"global"` or the guild id; indexed together with `name` for live records.
    pub scope_key: String,
    pub description: String,
    #[sea_orm(column_type = "Text")]
    pub options: String,
    pub category: String,
    pub enabled: bool,
    pub default_member_permissions: Option<String>,
    pub dm_permission: bool,
    pub version: i32,
    pub registry_id: Option<String>,
    pub registry_application_id: Option<String>,
    pub registry_version: Option<String>,
    pub registry_type: Option<i32>,
    pub deployment_status: String,
    pub deploy_count: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub last_error: Option<String>,
    pub last_deployed_at: Option<DateTimeUtc>,
    pub last_synced_at: Option<DateTimeUtc>,
    pub usage_count: i64,
    pub last_used_at: Option<DateTimeUtc>,
    #[sea_orm(column_type = "Text")]
    pub usage_by_scope: String,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
