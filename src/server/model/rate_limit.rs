//! Rate limit domain models.
//!
//! Fixed-window quotas keyed by `(action, identifier)`. The identifier is the Discord
//! application ID for sync/deploy and `"<scope>:<name>"` for per-command updates.

use std::fmt;

use crate::model::rate_limit::{ActionRateLimitDto, RateLimitCounterDto, RateLimitOverviewDto};

/// Maximum number of attempts per action and identifier within one window.
pub const MAX_ATTEMPTS: u32 = 5;

/// Length of a rate limit window.
pub const WINDOW_SECONDS: u64 = 3600;

/// Registry-mutating action namespaces that carry a quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateLimitAction {
    Update,
    Sync,
    Deploy,
}

impl RateLimitAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Sync => "sync",
            Self::Deploy => "deploy",
        }
    }
}

impl fmt::Display for RateLimitAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a quota check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitStatus {
    Allowed {
        remaining: u32,
        reset_in_seconds: u64,
    },
    Denied {
        reset_in_seconds: u64,
    },
    /// The counter store failed; the action proceeds without a quota check.
    Bypassed,
}

impl RateLimitStatus {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Self::Denied { .. })
    }

    pub fn to_dto(&self, action: RateLimitAction, identifier: &str) -> ActionRateLimitDto {
        let (remaining, reset_in_seconds) = match *self {
            Self::Allowed {
                remaining,
                reset_in_seconds,
            } => (remaining, reset_in_seconds),
            Self::Denied { reset_in_seconds } => (0, reset_in_seconds),
            Self::Bypassed => (MAX_ATTEMPTS, 0),
        };

        ActionRateLimitDto {
            action: action.as_str().to_string(),
            identifier: identifier.to_string(),
            remaining,
            blocked: !self.is_allowed(),
            reset_in_seconds,
            bypassed: matches!(self, Self::Bypassed),
        }
    }
}

/// Persisted counter for one `(action, identifier)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitCounter {
    pub action: String,
    pub identifier: String,
    pub count: u32,
    /// Unix timestamp (seconds) the current window started at.
    pub window_start: i64,
}

impl RateLimitCounter {
    pub fn from_entity(entity: entity::rate_limit_counter::Model) -> Self {
        Self {
            action: entity.action,
            identifier: entity.identifier,
            count: entity.count.max(0) as u32,
            window_start: entity.window_start,
        }
    }

    /// Whether the window is still open at `now`.
    pub fn is_active(&self, now: i64) -> bool {
        now < self.window_start + WINDOW_SECONDS as i64
    }

    /// Seconds until the window closes, `0` once it has expired.
    pub fn reset_in_seconds(&self, now: i64) -> u64 {
        (self.window_start + WINDOW_SECONDS as i64 - now).max(0) as u64
    }

    pub fn into_dto(self, now: i64) -> RateLimitCounterDto {
        let reset_in_seconds = self.reset_in_seconds(now);
        RateLimitCounterDto {
            action: self.action,
            identifier: self.identifier,
            count: self.count,
            window_start: self.window_start,
            reset_in_seconds,
        }
    }
}

/// Quota state of the registry-wide actions plus every open counter.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitOverview {
    /// `None` when the application ID could not be resolved.
    pub application_id: Option<String>,
    pub actions: Vec<(RateLimitAction, RateLimitStatus)>,
    pub counters: Vec<RateLimitCounter>,
    /// Unix timestamp (seconds) the overview was taken at.
    pub now: i64,
}

impl RateLimitOverview {
    pub fn into_dto(self) -> RateLimitOverviewDto {
        let identifier = self.application_id.clone().unwrap_or_default();
        let now = self.now;

        RateLimitOverviewDto {
            max_attempts: MAX_ATTEMPTS,
            window_seconds: WINDOW_SECONDS,
            application_id: self.application_id,
            actions: self
                .actions
                .iter()
                .map(|(action, status)| status.to_dto(*action, &identifier))
                .collect(),
            counters: self
                .counters
                .into_iter()
                .map(|counter| counter.into_dto(now))
                .collect(),
        }
    }
}
