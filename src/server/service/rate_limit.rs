//! Fixed-window rate limiter for registry-mutating actions.
//!
//! `check` is read-only; callers increment only once the guarded side effect has begun.
//! A failing counter store never blocks an action: checks report `Bypassed` and failed
//! increments are logged and dropped.

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::server::{
    data::rate_limit::RateLimitCounterRepository,
    error::AppError,
    model::rate_limit::{
        RateLimitAction, RateLimitCounter, RateLimitStatus, MAX_ATTEMPTS, WINDOW_SECONDS,
    },
};

pub struct RateLimiter<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> RateLimiter<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Checks the remaining quota for an action and identifier at the current time.
    pub async fn check(&self, action: RateLimitAction, identifier: &str) -> RateLimitStatus {
        self.check_at(action, identifier, Utc::now().timestamp())
            .await
    }

    /// Checks the remaining quota at `now` (unix seconds) without consuming an attempt.
    ///
    /// # Returns
    /// - `RateLimitStatus::Allowed` - Attempts remain in the current window
    /// - `RateLimitStatus::Denied` - The window's attempts are used up
    /// - `RateLimitStatus::Bypassed` - The counter could not be read
    pub async fn check_at(
        &self,
        action: RateLimitAction,
        identifier: &str,
        now: i64,
    ) -> RateLimitStatus {
        let repo = RateLimitCounterRepository::new(self.db);

        match repo.find(action.as_str(), identifier).await {
            Ok(Some(counter)) if counter.is_active(now) => {
                let reset_in_seconds = counter.reset_in_seconds(now);
                if counter.count >= MAX_ATTEMPTS {
                    RateLimitStatus::Denied { reset_in_seconds }
                } else {
                    RateLimitStatus::Allowed {
                        remaining: MAX_ATTEMPTS - counter.count,
                        reset_in_seconds,
                    }
                }
            }
            Ok(_) => RateLimitStatus::Allowed {
                remaining: MAX_ATTEMPTS,
                reset_in_seconds: WINDOW_SECONDS,
            },
            Err(e) => {
                tracing::warn!(
                    "Rate limit check for {}:{} failed, allowing: {}",
                    action,
                    identifier,
                    e
                );
                RateLimitStatus::Bypassed
            }
        }
    }

    /// Checks the quota and turns a denial into `AppError::RateLimited`.
    ///
    /// # Returns
    /// - `Ok(RateLimitStatus)` - Action may proceed (allowed or bypassed)
    /// - `Err(AppError::RateLimited)` - Quota exhausted for the current window
    pub async fn enforce(
        &self,
        action: RateLimitAction,
        identifier: &str,
    ) -> Result<RateLimitStatus, AppError> {
        match self.check(action, identifier).await {
            RateLimitStatus::Denied { reset_in_seconds } => Err(AppError::RateLimited {
                action: action.to_string(),
                remaining: 0,
                reset_in_seconds,
            }),
            status => Ok(status),
        }
    }

    /// Consumes one attempt at the current time.
    pub async fn increment(&self, action: RateLimitAction, identifier: &str) {
        self.increment_at(action, identifier, Utc::now().timestamp())
            .await
    }

    /// Consumes one attempt at `now` (unix seconds); failures are logged and dropped.
    pub async fn increment_at(&self, action: RateLimitAction, identifier: &str, now: i64) {
        let repo = RateLimitCounterRepository::new(self.db);

        if let Err(e) = repo.increment(action.as_str(), identifier, now).await {
            tracing::warn!(
                "Failed to increment rate limit counter {}:{}: {}",
                action,
                identifier,
                e
            );
        }
    }

    /// Lists the counters whose window is still open.
    pub async fn active_counters(&self) -> Result<Vec<RateLimitCounter>, AppError> {
        let repo = RateLimitCounterRepository::new(self.db);

        Ok(repo.get_active(Utc::now().timestamp()).await?)
    }
}
