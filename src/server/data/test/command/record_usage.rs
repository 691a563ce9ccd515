use super::*;

/// Tests recording invocations from guilds and direct messages.
///
/// Expected: total and per-scope counters incremented, version unchanged
#[tokio::test]
async fn increments_usage_counters() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_command_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let entity = CommandFactory::new(db).name("ping").build().await?;

    let repo = CommandRepository::new(db);
    repo.record_usage(entity.id, "777").await?;
    repo.record_usage(entity.id, "777").await?;
    let command = repo.record_usage(entity.id, "dm").await?.unwrap();

    assert_eq!(command.usage.count, 3);
    assert_eq!(command.usage.by_scope.get("777"), Some(&2));
    assert_eq!(command.usage.by_scope.get("dm"), Some(&1));
    assert!(command.usage.last_used_at.is_some());
    assert_eq!(command.version, 1);
    assert_eq!(command.deployment_status, DeploymentStatus::Pending);

    Ok(())
}

/// Tests that deleted commands do not record usage.
///
/// Expected: Ok(None)
#[tokio::test]
async fn ignores_deleted_commands() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_command_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let entity = CommandFactory::new(db).name("ping").deleted().build().await?;

    let repo = CommandRepository::new(db);
    let result = repo.record_usage(entity.id, "dm").await?;

    assert!(result.is_none());

    Ok(())
}

/// Tests that invocations recorded concurrently are all counted per scope.
///
/// Expected: ten interleaved invocations from one guild yield ten in its breakdown
#[tokio::test]
async fn concurrent_invocations_are_all_counted() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_command_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let entity = CommandFactory::new(db).name("ping").build().await?;

    let id = entity.id;
    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..10 {
        let db = db.clone();
        tasks.spawn(async move {
            CommandRepository::new(&db)
                .record_usage(id, "777")
                .await
                .map(|_| ())
        });
    }
    while let Some(result) = tasks.join_next().await {
        result.unwrap()?;
    }

    let command = CommandRepository::new(db)
        .find_by_id(id)
        .await?
        .unwrap();

    assert_eq!(command.usage.count, 10);
    assert_eq!(command.usage.by_scope.get("777"), Some(&10));

    Ok(())
}
