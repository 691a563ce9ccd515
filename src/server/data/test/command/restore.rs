use super::*;
use sea_orm::SqlErr;

/// Tests restoring a soft-deleted command.
///
/// Expected: deleted_at cleared, status pending, remote identifier kept
#[tokio::test]
async fn restores_deleted_command() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_command_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let entity = CommandFactory::new(db)
        .name("ping")
        .registry_id("1100")
        .deployment_status("deployed")
        .deleted()
        .build()
        .await?;

    let repo = CommandRepository::new(db);
    let command = repo.restore(entity.id, "tester".into()).await?.unwrap();

    assert!(command.deleted_at.is_none());
    assert_eq!(command.deployment_status, DeploymentStatus::Pending);
    assert_eq!(command.registry_id.as_deref(), Some("1100"));
    assert_eq!(command.version, entity.version);
    assert_eq!(command.updated_by.as_deref(), Some("tester"));

    Ok(())
}

/// Tests restoring a command that is not deleted.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_live_command() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_command_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let entity = CommandFactory::new(db).name("ping").build().await?;

    let repo = CommandRepository::new(db);
    let result = repo.restore(entity.id, "tester".into()).await?;

    assert!(result.is_none());

    Ok(())
}

/// Tests restoring while another live command holds the name.
///
/// Expected: Err with a unique constraint violation
#[tokio::test]
async fn rejects_restore_over_live_name() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_command_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let deleted = CommandFactory::new(db).name("ping").deleted().build().await?;
    CommandFactory::new(db).name("ping").build().await?;

    let repo = CommandRepository::new(db);
    let err = repo.restore(deleted.id, "tester".into()).await.unwrap_err();

    assert!(matches!(
        err.sql_err(),
        Some(SqlErr::UniqueConstraintViolation(_))
    ));

    Ok(())
}
