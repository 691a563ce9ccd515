use super::*;
use chrono::Utc;

/// Tests that an exhausted quota becomes a RateLimited error.
///
/// Expected: Err(RateLimited) with zero remaining and a reset time within the window
#[tokio::test]
async fn returns_rate_limited_error_when_exhausted() -> Result<(), AppError> {
    let test = TestBuilder::new().with_rate_limit_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    create_counter(db, "deploy", "42", MAX_ATTEMPTS as i32, Utc::now().timestamp()).await?;

    let limiter = RateLimiter::new(db);
    let result = limiter.enforce(RateLimitAction::Deploy, "42").await;

    match result {
        Err(AppError::RateLimited {
            action,
            remaining,
            reset_in_seconds,
        }) => {
            assert_eq!(action, "deploy");
            assert_eq!(remaining, 0);
            assert!(reset_in_seconds > 0 && reset_in_seconds <= WINDOW_SECONDS);
        }
        other => panic!("expected RateLimited, got {:?}", other.map(|_| ())),
    }

    Ok(())
}

/// Tests that enforcing does not consume an attempt.
///
/// Expected: repeated enforce calls keep the full quota
#[tokio::test]
async fn enforce_is_read_only() -> Result<(), AppError> {
    let test = TestBuilder::new().with_rate_limit_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let limiter = RateLimiter::new(db);
    for _ in 0..(MAX_ATTEMPTS + 2) {
        limiter.enforce(RateLimitAction::Update, "global:ping").await?;
    }

    assert!(limiter.active_counters().await?.is_empty());

    Ok(())
}

/// Tests listing the open counters.
///
/// Expected: counters recorded by increment are reported
#[tokio::test]
async fn lists_active_counters() -> Result<(), AppError> {
    let test = TestBuilder::new().with_rate_limit_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let limiter = RateLimiter::new(db);
    limiter.increment(RateLimitAction::Update, "global:ping").await;
    limiter.increment(RateLimitAction::Update, "global:ping").await;

    let counters = limiter.active_counters().await?;

    assert_eq!(counters.len(), 1);
    assert_eq!(counters[0].action, "update");
    assert_eq!(counters[0].identifier, "global:ping");
    assert_eq!(counters[0].count, 2);

    Ok(())
}
