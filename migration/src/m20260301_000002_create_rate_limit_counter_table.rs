use sea_orm_migration::{prelude::*, schema::*};

use crate::RATE_LIMIT_COUNTER_UNIQUE_INDEX;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RateLimitCounter::Table)
                    .if_not_exists()
                    .col(pk_auto(RateLimitCounter::Id))
                    .col(string(RateLimitCounter::Action))
                    .col(string(RateLimitCounter::Identifier))
                    .col(integer(RateLimitCounter::Count).default(0))
                    .col(big_integer(RateLimitCounter::WindowStart))
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(RATE_LIMIT_COUNTER_UNIQUE_INDEX)
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RateLimitCounter::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum RateLimitCounter {
    Table,
    Id,
    Action,
    Identifier,
    Count,
    WindowStart,
}
