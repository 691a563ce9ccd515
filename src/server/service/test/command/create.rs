use super::*;

/// Tests that two creates of the same (name, scope) yield one success and one conflict.
///
/// Expected: Ok for the first, Err(Conflict) for the second
#[tokio::test]
async fn second_create_in_scope_conflicts() -> Result<(), AppError> {
    let test = TestBuilder::new().with_command_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let cache = CommandCache::new(true);

    let service = CommandService::new(db, &cache);
    let first = service.create(create_param("ping", CommandScope::Global)).await;
    let second = service.create(create_param("ping", CommandScope::Global)).await;

    assert!(first.is_ok());
    assert!(matches!(second, Err(AppError::Conflict(_))));

    Ok(())
}

/// Tests that creating invalidates cached lists.
///
/// Expected: a list read after the create includes the new command
#[tokio::test]
async fn invalidates_cached_lists() -> Result<(), AppError> {
    let test = TestBuilder::new().with_command_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let cache = CommandCache::new(true);

    let service = CommandService::new(db, &cache);
    service.create(create_param("ping", CommandScope::Global)).await?;
    assert_eq!(service.list(CommandFilter::default()).await?.len(), 1);

    service.create(create_param("echo", CommandScope::Global)).await?;
    let names: Vec<String> = service
        .list(CommandFilter::default())
        .await?
        .into_iter()
        .map(|c| c.name)
        .collect();

    assert_eq!(names, vec!["echo".to_string(), "ping".to_string()]);

    Ok(())
}
