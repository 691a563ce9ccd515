use super::*;

fn describe(name: &str, description: &str) -> UpdateCommandParam {
    UpdateCommandParam {
        name: name.to_string(),
        scope: CommandScope::Global,
        description: Some(description.to_string()),
        options: None,
        category: None,
        enabled: None,
        default_member_permissions: None,
        dm_permission: None,
        updated_by: "editor".to_string(),
    }
}

/// Tests updating a live command.
///
/// Expected: version bumped and status outdated
#[tokio::test]
async fn updates_and_marks_outdated() -> Result<(), AppError> {
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
    let command = service.update(describe("ping", "Replies with pong")).await?;

    assert_eq!(command.description, "Replies with pong");
    assert_eq!(command.version, 2);
    assert_eq!(command.deployment_status, DeploymentStatus::Outdated);
    assert_eq!(command.registry_id.as_deref(), Some("1100"));

    Ok(())
}

/// Tests updating a missing command.
///
/// Expected: Err(NotFound)
#[tokio::test]
async fn returns_not_found_for_missing_command() -> Result<(), AppError> {
    let test = TestBuilder::new().with_command_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let cache = CommandCache::new(true);

    let service = CommandService::new(db, &cache);
    let result = service.update(describe("ping", "Replies with pong")).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}

/// Tests the per-command update quota.
///
/// Expected: five updates succeed, the sixth is rate limited, other commands unaffected
#[tokio::test]
async fn rate_limits_sixth_update_of_a_command() -> Result<(), AppError> {
    let test = TestBuilder::new().with_command_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let cache = CommandCache::new(true);

    CommandFactory::new(db).name("ping").build().await?;
    CommandFactory::new(db).name("echo").build().await?;

    let service = CommandService::new(db, &cache);
    for i in 0..5 {
        service
            .update(describe("ping", &format!("Revision {}", i)))
            .await?;
    }

    let result = service.update(describe("ping", "One too many")).await;
    assert!(matches!(
        result,
        Err(AppError::RateLimited { remaining: 0, .. })
    ));

    let stored = service.get_by_name("ping", CommandScope::Global).await?;
    assert_eq!(stored.description, "Revision 4");
    assert_eq!(stored.version, 6);

    service.update(describe("echo", "Still allowed")).await?;

    Ok(())
}

/// Tests that failed updates do not consume quota.
///
/// Expected: updates of a missing command never become rate limited
#[tokio::test]
async fn failed_updates_do_not_count() -> Result<(), AppError> {
    let test = TestBuilder::new().with_command_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let cache = CommandCache::new(true);

    let service = CommandService::new(db, &cache);
    for _ in 0..7 {
        let result = service.update(describe("ghost", "Missing")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    Ok(())
}
