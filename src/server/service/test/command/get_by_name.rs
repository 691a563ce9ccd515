use super::*;
use crate::server::data::command::CommandRepository;

/// Tests reading a missing command.
///
/// Expected: Err(NotFound)
#[tokio::test]
async fn returns_not_found_for_missing_command() -> Result<(), AppError> {
    let test = TestBuilder::new().with_command_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let cache = CommandCache::new(true);

    CommandFactory::new(db).name("ping").guild_id("9").build().await?;

    let service = CommandService::new(db, &cache);
    let result = service.get_by_name("ping", CommandScope::Global).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}

/// Tests that detail reads are served from the cache until it is invalidated.
///
/// Expected: a write that bypasses the service is invisible until invalidation
#[tokio::test]
async fn serves_detail_from_cache() -> Result<(), AppError> {
    let test = TestBuilder::new().with_command_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let cache = CommandCache::new(true);

    let entity = CommandFactory::new(db).name("ping").build().await?;

    let service = CommandService::new(db, &cache);
    let first = service.get_by_name("ping", CommandScope::Global).await?;
    assert!(first.enabled);

    CommandRepository::new(db)
        .set_enabled(entity.id, false, "direct".into())
        .await?;

    let cached = service.get_by_name("ping", CommandScope::Global).await?;
    assert!(cached.enabled);

    cache.invalidate_all().await;
    let fresh = service.get_by_name("ping", CommandScope::Global).await?;
    assert!(!fresh.enabled);

    Ok(())
}

/// Tests that a disabled cache always reads from the database.
///
/// Expected: direct writes are visible immediately
#[tokio::test]
async fn disabled_cache_reads_through() -> Result<(), AppError> {
    let test = TestBuilder::new().with_command_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let cache = CommandCache::new(false);

    let entity = CommandFactory::new(db).name("ping").build().await?;

    let service = CommandService::new(db, &cache);
    service.get_by_name("ping", CommandScope::Global).await?;

    CommandRepository::new(db)
        .set_enabled(entity.id, false, "direct".into())
        .await?;

    let fresh = service.get_by_name("ping", CommandScope::Global).await?;
    assert!(!fresh.enabled);

    Ok(())
}
