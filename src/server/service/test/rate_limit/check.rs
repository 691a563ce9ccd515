use super::*;

const NOW: i64 = 1_800_000_000;

/// Tests that five attempts are allowed and the sixth is denied.
///
/// Expected: remaining counts down from 5, sixth check denied until the window resets
#[tokio::test]
async fn denies_sixth_attempt_in_window() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_rate_limit_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let limiter = RateLimiter::new(db);

    for attempt in 0..MAX_ATTEMPTS {
        let status = limiter.check_at(RateLimitAction::Deploy, "42", NOW).await;
        assert_eq!(
            status,
            RateLimitStatus::Allowed {
                remaining: MAX_ATTEMPTS - attempt,
                reset_in_seconds: WINDOW_SECONDS,
            }
        );
        limiter.increment_at(RateLimitAction::Deploy, "42", NOW).await;
    }

    let status = limiter.check_at(RateLimitAction::Deploy, "42", NOW + 60).await;
    assert_eq!(
        status,
        RateLimitStatus::Denied {
            reset_in_seconds: WINDOW_SECONDS - 60
        }
    );

    Ok(())
}

/// Tests that the quota returns once the window elapses.
///
/// Expected: full quota after the window, and the next increment opens a new window
#[tokio::test]
async fn allows_again_after_window_elapses() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_rate_limit_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let limiter = RateLimiter::new(db);
    for _ in 0..MAX_ATTEMPTS {
        limiter.increment_at(RateLimitAction::Sync, "42", NOW).await;
    }
    assert!(!limiter
        .check_at(RateLimitAction::Sync, "42", NOW)
        .await
        .is_allowed());

    let later = NOW + WINDOW_SECONDS as i64;
    let status = limiter.check_at(RateLimitAction::Sync, "42", later).await;
    assert_eq!(
        status,
        RateLimitStatus::Allowed {
            remaining: MAX_ATTEMPTS,
            reset_in_seconds: WINDOW_SECONDS,
        }
    );

    limiter.increment_at(RateLimitAction::Sync, "42", later).await;
    let status = limiter.check_at(RateLimitAction::Sync, "42", later).await;
    assert_eq!(
        status,
        RateLimitStatus::Allowed {
            remaining: MAX_ATTEMPTS - 1,
            reset_in_seconds: WINDOW_SECONDS,
        }
    );

    Ok(())
}

/// Tests that actions never share quota.
///
/// Expected: deploy exhausted while sync and update remain fully available
#[tokio::test]
async fn keeps_action_namespaces_separate() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_rate_limit_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    create_counter(db, "deploy", "42", MAX_ATTEMPTS as i32, NOW).await?;

    let limiter = RateLimiter::new(db);

    assert!(!limiter
        .check_at(RateLimitAction::Deploy, "42", NOW)
        .await
        .is_allowed());
    assert!(limiter
        .check_at(RateLimitAction::Sync, "42", NOW)
        .await
        .is_allowed());
    assert!(limiter
        .check_at(RateLimitAction::Update, "42", NOW)
        .await
        .is_allowed());

    Ok(())
}

/// Tests failing open when the counter store is unavailable.
///
/// Expected: Bypassed status and increments that do not fail the caller
#[tokio::test]
async fn bypasses_when_counter_store_fails() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_command_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let limiter = RateLimiter::new(db);
    limiter.increment_at(RateLimitAction::Deploy, "42", NOW).await;
    let status = limiter.check_at(RateLimitAction::Deploy, "42", NOW).await;

    assert_eq!(status, RateLimitStatus::Bypassed);
    assert!(status.is_allowed());

    Ok(())
}
