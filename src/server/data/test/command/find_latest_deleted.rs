use super::*;

/// Tests that lookups by name distinguish live and deleted records.
///
/// Expected: find_live ignores the deleted record, find_latest_deleted returns it
#[tokio::test]
async fn separates_live_and_deleted_records() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_command_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let deleted = CommandFactory::new(db).name("ping").deleted().build().await?;

    let repo = CommandRepository::new(db);

    assert!(repo.find_live("ping", CommandScope::Global).await?.is_none());
    let found = repo
        .find_latest_deleted("ping", CommandScope::Global)
        .await?
        .unwrap();
    assert_eq!(found.id, deleted.id);

    Ok(())
}

/// Tests that deleted lookups are scoped.
///
/// Expected: Ok(None) when the deleted record belongs to another scope
#[tokio::test]
async fn ignores_other_scopes() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_command_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    CommandFactory::new(db)
        .name("ping")
        .guild_id("555")
        .deleted()
        .build()
        .await?;

    let repo = CommandRepository::new(db);

    assert!(repo
        .find_latest_deleted("ping", CommandScope::Global)
        .await?
        .is_none());
    assert!(repo
        .find_latest_deleted("ping", CommandScope::Guild(555))
        .await?
        .is_some());

    Ok(())
}
