pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_command_table;
mod m20260301_000002_create_rate_limit_counter_table;

/// Partial unique index enforcing one live command per (name, scope).
///
/// Soft-deleted rows are excluded so a deleted command never blocks re-creating its name.
pub const COMMAND_LIVE_UNIQUE_INDEX: &str = "CREATE UNIQUE INDEX IF NOT EXISTS \
     idx_command_live_name_scope ON command (name, scope_key) WHERE deleted_at IS NULL";

/// Unique index backing the atomic upsert of rate limit counters.
pub const RATE_LIMIT_COUNTER_UNIQUE_INDEX: &str = "CREATE UNIQUE INDEX IF NOT EXISTS \
     idx_rate_limit_counter_action_identifier ON rate_limit_counter (action, identifier)";

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_command_table::Migration),
            Box::new(m20260301_000002_create_rate_limit_counter_table::Migration),
        ]
    }
}
