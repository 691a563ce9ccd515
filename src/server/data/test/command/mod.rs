use crate::server::{
    data::command::CommandRepository,
    model::command::{
        CommandCategory, CommandFilter, CommandScope, CreateCommandParam, DeploymentStatus,
        UpdateCommandParam,
    },
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory::command::CommandFactory};

mod find_latest_deleted;
mod list;
mod mark_deployed;
mod record_usage;
mod reset_failed;
mod restore;
mod soft_delete;

fn create_param(name: &str, scope: CommandScope) -> CreateCommandParam {
    CreateCommandParam {
        name: name.to_string(),
        scope,
        description: format!("Runs {}", name),
        options: Vec::new(),
        category: CommandCategory::General,
        enabled: true,
        default_member_permissions: None,
        dm_permission: true,
        created_by: "tester".to_string(),
    }
}
