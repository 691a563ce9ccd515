use super::*;
use crate::server::registry::RegisteredCommand;
use chrono::Utc;

fn remote(id: &str, name: &str) -> RegisteredCommand {
    RegisteredCommand {
        id: id.to_string(),
        application_id: "42".to_string(),
        name: name.to_string(),
        description: "Remote".to_string(),
        kind: 1,
        version: format!("{}9", id),
        options: Vec::new(),
        default_member_permissions: None,
        dm_permission: Some(true),
        guild_id: None,
    }
}

/// Tests writing back a deploy result.
///
/// Expected: remote identifier stored, status deployed, deploy counter incremented
#[tokio::test]
async fn writes_back_remote_identifier() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_command_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let entity = CommandFactory::new(db).name("ping").build().await?;

    let repo = CommandRepository::new(db);
    repo.mark_deployed(entity.id, &remote("1100", "ping"), Utc::now())
        .await?;
    repo.mark_deployed(entity.id, &remote("1100", "ping"), Utc::now())
        .await?;

    let command = repo.find_live("ping", CommandScope::Global).await?.unwrap();
    assert_eq!(command.registry_id.as_deref(), Some("1100"));
    assert_eq!(command.registry_application_id.as_deref(), Some("42"));
    assert_eq!(command.registry_version.as_deref(), Some("11009"));
    assert_eq!(command.registry_type, Some(1));
    assert_eq!(command.deployment_status, DeploymentStatus::Deployed);
    assert_eq!(command.deploy_count, 2);
    assert!(command.last_deployed_at.is_some());

    Ok(())
}

/// Tests clearing a remote identifier.
///
/// Expected: identifier fields null and status pending
#[tokio::test]
async fn clear_registry_resets_to_pending() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_command_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let entity = CommandFactory::new(db)
        .name("ping")
        .registry_id("1100")
        .deployment_status("deployed")
        .build()
        .await?;

    let repo = CommandRepository::new(db);
    repo.clear_registry(entity.id).await?;

    let command = repo.find_live("ping", CommandScope::Global).await?.unwrap();
    assert!(command.registry_id.is_none());
    assert!(command.registry_application_id.is_none());
    assert_eq!(command.deployment_status, DeploymentStatus::Pending);

    Ok(())
}

/// Tests clearing by remote identifier also reaches soft-deleted records.
///
/// Expected: Ok(1) and the deleted record no longer holds the identifier
#[tokio::test]
async fn clear_by_registry_id_includes_deleted_records() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_command_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    CommandFactory::new(db)
        .name("ping")
        .registry_id("1100")
        .deleted()
        .build()
        .await?;

    let repo = CommandRepository::new(db);
    let cleared = repo.clear_registry_by_registry_id("1100").await?;

    assert_eq!(cleared, 1);
    let command = repo
        .find_latest_deleted("ping", CommandScope::Global)
        .await?
        .unwrap();
    assert!(command.registry_id.is_none());

    Ok(())
}

/// Tests marking commands failed.
///
/// Expected: only the listed commands are failed and carry the message
#[tokio::test]
async fn mark_failed_records_message() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_command_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let ping = CommandFactory::new(db).name("ping").build().await?;
    CommandFactory::new(db).name("echo").build().await?;

    let repo = CommandRepository::new(db);
    repo.mark_failed(&[ping.id], "bulk overwrite rejected").await?;

    let ping = repo.find_live("ping", CommandScope::Global).await?.unwrap();
    let echo = repo.find_live("echo", CommandScope::Global).await?.unwrap();
    assert_eq!(ping.deployment_status, DeploymentStatus::Failed);
    assert_eq!(ping.last_error.as_deref(), Some("bulk overwrite rejected"));
    assert_eq!(echo.deployment_status, DeploymentStatus::Pending);

    Ok(())
}
