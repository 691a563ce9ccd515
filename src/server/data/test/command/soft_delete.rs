use super::*;

/// Tests soft deleting a live command.
///
/// Expected: deleted_at set and remote identifier untouched
#[tokio::test]
async fn sets_deleted_at_and_keeps_identifier() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_command_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let entity = CommandFactory::new(db)
        .name("ping")
        .registry_id("1100")
        .build()
        .await?;

    let repo = CommandRepository::new(db);
    let command = repo.soft_delete(entity.id, "tester".into()).await?.unwrap();

    assert!(command.deleted_at.is_some());
    assert_eq!(command.registry_id.as_deref(), Some("1100"));
    assert!(repo.find_live("ping", CommandScope::Global).await?.is_none());

    Ok(())
}

/// Tests soft deleting an already deleted command.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_when_already_deleted() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_command_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let entity = CommandFactory::new(db).name("ping").deleted().build().await?;

    let repo = CommandRepository::new(db);
    let result = repo.soft_delete(entity.id, "tester".into()).await?;

    assert!(result.is_none());

    Ok(())
}
