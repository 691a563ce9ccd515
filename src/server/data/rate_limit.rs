//! Rate limit counter repository.
//!
//! Counters are keyed by `(action, identifier)`. The increment is a single upsert that
//! restarts the window when the stored one has elapsed, so concurrent increments never
//! lose updates or reset a live window.

use migration::OnConflict;
use sea_orm::{
    sea_query::Expr, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::server::model::rate_limit::{RateLimitCounter, WINDOW_SECONDS};

pub struct RateLimitCounterRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> RateLimitCounterRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds the stored counter for an action and identifier, expired or not.
    ///
    /// # Returns
    /// - `Ok(Some(RateLimitCounter))` - Counter exists
    /// - `Ok(None)` - No attempt was ever recorded
    /// - `Err(DbErr)` - Database error
    pub async fn find(
        &self,
        action: &str,
        identifier: &str,
    ) -> Result<Option<RateLimitCounter>, DbErr> {
        let entity = entity::prelude::RateLimitCounter::find()
            .filter(entity::rate_limit_counter::Column::Action.eq(action))
            .filter(entity::rate_limit_counter::Column::Identifier.eq(identifier))
            .one(self.db)
            .await?;

        Ok(entity.map(RateLimitCounter::from_entity))
    }

    /// Records one attempt at `now` (unix seconds).
    ///
    /// Inserts a counter with a fresh window on the first attempt. Otherwise increments the
    /// stored count, or restarts the window at `now` with a count of 1 when the stored
    /// window has expired.
    ///
    /// # Returns
    /// - `Ok(RateLimitCounter)` - Counter after the increment
    /// - `Err(DbErr)` - Database error
    pub async fn increment(
        &self,
        action: &str,
        identifier: &str,
        now: i64,
    ) -> Result<RateLimitCounter, DbErr> {
        let expired_before = now - WINDOW_SECONDS as i64;

        let entity = entity::prelude::RateLimitCounter::insert(
            entity::rate_limit_counter::ActiveModel {
                id: ActiveValue::NotSet,
                action: ActiveValue::Set(action.to_string()),
                identifier: ActiveValue::Set(identifier.to_string()),
                count: ActiveValue::Set(1),
                window_start: ActiveValue::Set(now),
            },
        )
        .on_conflict(
            OnConflict::columns([
                entity::rate_limit_counter::Column::Action,
                entity::rate_limit_counter::Column::Identifier,
            ])
            .value(
                entity::rate_limit_counter::Column::Count,
                Expr::cust_with_values(
                    "CASE WHEN rate_limit_counter.window_start <= ? THEN 1 \
                     ELSE rate_limit_counter.count + 1 END",
                    [expired_before],
                ),
            )
            .value(
                entity::rate_limit_counter::Column::WindowStart,
                Expr::cust_with_values(
                    "CASE WHEN rate_limit_counter.window_start <= ? THEN excluded.window_start \
                     ELSE rate_limit_counter.window_start END",
                    [expired_before],
                ),
            )
            .to_owned(),
        )
        .exec_with_returning(self.db)
        .await?;

        Ok(RateLimitCounter::from_entity(entity))
    }

    /// Returns every counter whose window is still open at `now`.
    pub async fn get_active(&self, now: i64) -> Result<Vec<RateLimitCounter>, DbErr> {
        let entities = entity::prelude::RateLimitCounter::find()
            .filter(
                entity::rate_limit_counter::Column::WindowStart.gt(now - WINDOW_SECONDS as i64),
            )
            .order_by_asc(entity::rate_limit_counter::Column::Action)
            .order_by_asc(entity::rate_limit_counter::Column::Identifier)
            .all(self.db)
            .await?;

        Ok(entities
            .into_iter()
            .map(RateLimitCounter::from_entity)
            .collect())
    }
}
