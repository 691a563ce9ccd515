//! Rate limit counter factory for seeding limiter state in tests.

use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Inserts a counter row for `(action, identifier)` with an explicit count and window start.
///
/// # Arguments
/// - `db` - Database connection
/// - `action` - Action namespace, e.g. `"deploy"`
/// - `identifier` - Identifier within the namespace
/// - `count` - Attempts already consumed in the window
/// - `window_start` - Unix timestamp (seconds) the window started at
///
/// # Returns
/// - `Ok(entity::rate_limit_counter::Model)` - Created counter entity
/// - `Err(DbErr)` - Database error during insert
pub async fn create_counter(
    db: &DatabaseConnection,
    action: impl Into<String>,
    identifier: impl Into<String>,
    count: i32,
    window_start: i64,
) -> Result<entity::rate_limit_counter::Model, DbErr> {
    entity::rate_limit_counter::ActiveModel {
        id: ActiveValue::NotSet,
        action: ActiveValue::Set(action.into()),
        identifier: ActiveValue::Set(identifier.into()),
        count: ActiveValue::Set(count),
        window_start: ActiveValue::Set(window_start),
    }
    .insert(db)
    .await
}
