use super::*;

/// Tests removing a live command's remote registration.
///
/// Expected: remote entry deleted, identifier cleared, status pending
#[tokio::test]
async fn deletes_remote_and_clears_identifier() -> Result<(), AppError> {
    let test = TestBuilder::new().with_command_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let cache = CommandCache::new(true);
    let registry = FakeRegistry::new();

    let ping_id = registry.seed(CommandScope::Global, "ping");
    CommandFactory::new(db)
        .name("ping")
        .registry_id(ping_id)
        .deployment_status("deployed")
        .build()
        .await?;

    let service = ReconciliationService::new(db, &cache, &registry);
    let command = service
        .remove_from_discord("ping", CommandScope::Global)
        .await?;

    assert!(command.registry_id.is_none());
    assert_eq!(command.deployment_status, DeploymentStatus::Pending);
    assert!(registry.names(CommandScope::Global).is_empty());

    Ok(())
}

/// Tests removing the registration of a soft-deleted command.
///
/// Expected: the latest deleted record is used
#[tokio::test]
async fn falls_back_to_deleted_command() -> Result<(), AppError> {
    let test = TestBuilder::new().with_command_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let cache = CommandCache::new(true);
    let registry = FakeRegistry::new();

    let ping_id = registry.seed(CommandScope::Global, "ping");
    CommandFactory::new(db)
        .name("ping")
        .registry_id(ping_id)
        .deleted()
        .build()
        .await?;

    let service = ReconciliationService::new(db, &cache, &registry);
    let command = service
        .remove_from_discord("ping", CommandScope::Global)
        .await?;

    assert!(command.deleted_at.is_some());
    assert!(command.registry_id.is_none());
    assert!(registry.names(CommandScope::Global).is_empty());

    Ok(())
}

/// Tests a command that was never registered.
///
/// Expected: Err(NotFound) without calling the registry
#[tokio::test]
async fn returns_not_found_without_identifier() -> Result<(), AppError> {
    let test = TestBuilder::new().with_command_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let cache = CommandCache::new(true);
    let registry = FakeRegistry::new();

    CommandFactory::new(db).name("ping").build().await?;

    let service = ReconciliationService::new(db, &cache, &registry);
    let result = service
        .remove_from_discord("ping", CommandScope::Global)
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(registry.calls().is_empty());

    Ok(())
}
