use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ActionRateLimitDto {
    pub action: String,
    pub identifier: String,
    pub remaining: u32,
    pub blocked: bool,
    pub reset_in_seconds: u64,
    /// The counter store could not be read and the action is allowed without a quota check.
    pub bypassed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RateLimitCounterDto {
    pub action: String,
    pub identifier: String,
    pub count: u32,
    pub window_start: i64,
    pub reset_in_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RateLimitOverviewDto {
    pub max_attempts: u32,
    pub window_seconds: u64,
    pub application_id: Option<String>,
    pub actions: Vec<ActionRateLimitDto>,
    pub counters: Vec<RateLimitCounterDto>,
}
