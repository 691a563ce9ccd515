use crate::server::{
    error::AppError,
    model::rate_limit::{RateLimitAction, RateLimitStatus, MAX_ATTEMPTS, WINDOW_SECONDS},
    service::rate_limit::RateLimiter,
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory::create_counter};

mod check;
mod enforce;
