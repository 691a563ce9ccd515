use super::*;
use crate::server::model::rate_limit::{RateLimitAction, RateLimitStatus, MAX_ATTEMPTS};

/// Tests the overview after one deploy.
///
/// Expected: deploy shows one attempt used, sync untouched, one open counter
#[tokio::test]
async fn reports_action_state_and_counters() -> Result<(), AppError> {
    let test = TestBuilder::new().with_command_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let cache = CommandCache::new(true);
    let registry = FakeRegistry::new();

    CommandFactory::new(db).name("ping").build().await?;

    let service = ReconciliationService::new(db, &cache, &registry);
    service.deploy(CommandScope::Global).await?;
    let overview = service.rate_limit_overview().await?;

    assert_eq!(overview.application_id.as_deref(), Some("42"));
    let deploy = overview
        .actions
        .iter()
        .find(|(action, _)| *action == RateLimitAction::Deploy)
        .map(|(_, status)| *status);
    assert!(matches!(
        deploy,
        Some(RateLimitStatus::Allowed { remaining, .. }) if remaining == MAX_ATTEMPTS - 1
    ));
    assert_eq!(overview.counters.len(), 1);
    assert_eq!(overview.counters[0].count, 1);

    Ok(())
}

/// Tests the overview when the application cannot be resolved.
///
/// Expected: no application ID and no per-action state
#[tokio::test]
async fn tolerates_unresolved_application() -> Result<(), AppError> {
    let test = TestBuilder::new().with_command_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let cache = CommandCache::new(true);
    let registry = FakeRegistry::new();
    registry.fail_application_id();

    let service = ReconciliationService::new(db, &cache, &registry);
    let overview = service.rate_limit_overview().await?;

    assert!(overview.application_id.is_none());
    assert!(overview.actions.is_empty());

    Ok(())
}

/// Tests the overview when the counter store cannot be read.
///
/// Expected: both actions bypassed and no counters instead of an error
#[tokio::test]
async fn tolerates_unreadable_counter_store() -> Result<(), AppError> {
    let test = TestBuilder::new().with_command_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let cache = CommandCache::new(true);
    let registry = FakeRegistry::new();

    let service = ReconciliationService::new(db, &cache, &registry);
    let overview = service.rate_limit_overview().await?;

    assert_eq!(overview.application_id.as_deref(), Some("42"));
    assert_eq!(overview.actions.len(), 2);
    assert!(overview
        .actions
        .iter()
        .all(|(_, status)| *status == RateLimitStatus::Bypassed));
    assert!(overview.counters.is_empty());

    Ok(())
}
