use super::*;

/// Tests toggling a command off and on again.
///
/// Expected: enabled flips each time, status outdated, version bumped twice
#[tokio::test]
async fn flips_enabled_and_marks_outdated() -> Result<(), AppError> {
    let test = TestBuilder::new().with_command_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let cache = CommandCache::new(true);

    CommandFactory::new(db)
        .name("ping")
        .registry_id("1100")
        .deployment_status("deployed")
        .build()
        .await?;

    let service = CommandService::new(db, &cache);
    let disabled = service
        .toggle("ping", CommandScope::Global, "editor".into())
        .await?;
    assert!(!disabled.enabled);
    assert_eq!(disabled.deployment_status, DeploymentStatus::Outdated);
    assert_eq!(disabled.registry_id.as_deref(), Some("1100"));

    let enabled = service
        .toggle("ping", CommandScope::Global, "editor".into())
        .await?;
    assert!(enabled.enabled);
    assert_eq!(enabled.version, 3);

    Ok(())
}

/// Tests toggling a missing command.
///
/// Expected: Err(NotFound)
#[tokio::test]
async fn returns_not_found_for_missing_command() -> Result<(), AppError> {
    let test = TestBuilder::new().with_command_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let cache = CommandCache::new(true);

    let service = CommandService::new(db, &cache);
    let result = service
        .toggle("ping", CommandScope::Guild(5), "editor".into())
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}
