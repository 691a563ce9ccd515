use sea_orm_migration::{prelude::*, schema::*};

use crate::COMMAND_LIVE_UNIQUE_INDEX;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Command::Table)
                    .if_not_exists()
                    .col(pk_auto(Command::Id))
                    .col(string(Command::Name))
                    .col(string_null(Command::GuildId))
                    .col(string(Command::ScopeKey))
                    .col(string(Command::Description))
                    .col(text(Command::Options))
                    .col(string(Command::Category))
                    .col(boolean(Command::Enabled).default(true))
                    .col(string_null(Command::DefaultMemberPermissions))
                    .col(boolean(Command::DmPermission).default(true))
                    .col(integer(Command::Version).default(1))
                    .col(string_null(Command::RegistryId))
                    .col(string_null(Command::RegistryApplicationId))
                    .col(string_null(Command::RegistryVersion))
                    .col(integer_null(Command::RegistryType))
                    .col(string(Command::DeploymentStatus))
                    .col(integer(Command::DeployCount).default(0))
                    .col(text_null(Command::LastError))
                    .col(timestamp_with_time_zone_null(Command::LastDeployedAt))
                    .col(timestamp_with_time_zone_null(Command::LastSyncedAt))
                    .col(big_integer(Command::UsageCount).default(0))
                    .col(timestamp_with_time_zone_null(Command::LastUsedAt))
                    .col(text(Command::UsageByScope))
                    .col(string(Command::CreatedBy))
                    .col(string_null(Command::UpdatedBy))
                    .col(
                        timestamp_with_time_zone(Command::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(Command::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(timestamp_with_time_zone_null(Command::DeletedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_command_scope_key")
                    .table(Command::Table)
                    .col(Command::ScopeKey)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(COMMAND_LIVE_UNIQUE_INDEX)
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Command::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Command {
    Table,
    Id,
    Name,
    GuildId,
    ScopeKey,
    Description,
    Options,
    Category,
    Enabled,
    DefaultMemberPermissions,
    DmPermission,
    Version,
    RegistryId,
    RegistryApplicationId,
    RegistryVersion,
    RegistryType,
    DeploymentStatus,
    DeployCount,
    LastError,
    LastDeployedAt,
    LastSyncedAt,
    UsageCount,
    LastUsedAt,
    UsageByScope,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
