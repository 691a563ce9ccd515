use super::*;

/// Tests that soft delete followed by restore returns the same record.
///
/// Expected: restored command equals the original apart from status and audit fields,
/// and is listed again
#[tokio::test]
async fn soft_delete_then_restore_round_trips() -> Result<(), AppError> {
    let test = TestBuilder::new().with_command_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let cache = CommandCache::new(true);

    let service = CommandService::new(db, &cache);
    let original = service
        .create(create_param("ping", CommandScope::Global))
        .await?;

    let deleted = service
        .soft_delete("ping", CommandScope::Global, "editor".into())
        .await?;
    assert!(deleted.deleted_at.is_some());
    assert!(service.list(CommandFilter::default()).await?.is_empty());

    let restored = service
        .restore("ping", CommandScope::Global, "editor".into())
        .await?;

    assert_eq!(restored.id, original.id);
    assert_eq!(restored.name, original.name);
    assert_eq!(restored.description, original.description);
    assert_eq!(restored.options, original.options);
    assert_eq!(restored.category, original.category);
    assert_eq!(restored.enabled, original.enabled);
    assert_eq!(restored.deployment_status, DeploymentStatus::Pending);
    assert!(restored.deleted_at.is_none());

    let listed = service.list(CommandFilter::default()).await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, original.id);

    Ok(())
}

/// Tests deleting an already deleted command.
///
/// Expected: Err(NotFound)
#[tokio::test]
async fn returns_not_found_when_already_deleted() -> Result<(), AppError> {
    let test = TestBuilder::new().with_command_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let cache = CommandCache::new(true);

    CommandFactory::new(db).name("ping").deleted().build().await?;

    let service = CommandService::new(db, &cache);
    let result = service
        .soft_delete("ping", CommandScope::Global, "editor".into())
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}

/// Tests restoring while a live command holds the name.
///
/// Expected: Err(Conflict) and the deleted record stays deleted
#[tokio::test]
async fn restore_conflicts_with_live_command() -> Result<(), AppError> {
    let test = TestBuilder::new().with_command_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let cache = CommandCache::new(true);

    CommandFactory::new(db).name("ping").deleted().build().await?;
    CommandFactory::new(db).name("ping").build().await?;

    let service = CommandService::new(db, &cache);
    let result = service
        .restore("ping", CommandScope::Global, "editor".into())
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    let deleted = service
        .list(CommandFilter {
            deleted: true,
            ..Default::default()
        })
        .await?;
    assert_eq!(deleted.len(), 1);

    Ok(())
}

/// Tests restoring a name that was never deleted.
///
/// Expected: Err(NotFound)
#[tokio::test]
async fn restore_returns_not_found_without_deleted_record() -> Result<(), AppError> {
    let test = TestBuilder::new().with_command_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let cache = CommandCache::new(true);

    let service = CommandService::new(db, &cache);
    let result = service
        .restore("ping", CommandScope::Global, "editor".into())
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}
