use super::*;

/// Tests moving failed commands of one scope back to pending.
///
/// Expected: only the live, enabled failed command of the scope is reset and keeps its error
#[tokio::test]
async fn resets_failed_commands_in_scope() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_command_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    CommandFactory::new(db)
        .name("ping")
        .deployment_status("failed")
        .build()
        .await?;
    CommandFactory::new(db)
        .name("kick")
        .enabled(false)
        .deployment_status("failed")
        .build()
        .await?;
    CommandFactory::new(db)
        .name("old")
        .deployment_status("failed")
        .deleted()
        .build()
        .await?;
    CommandFactory::new(db)
        .name("ping")
        .guild_id("9")
        .deployment_status("failed")
        .build()
        .await?;

    let repo = CommandRepository::new(db);
    let ping = repo.find_live("ping", CommandScope::Global).await?.unwrap();
    repo.mark_failed(&[ping.id], "bulk overwrite rejected").await?;

    let reset = repo.reset_failed(CommandScope::Global).await?;

    assert_eq!(reset, 1);
    let ping = repo.find_live("ping", CommandScope::Global).await?.unwrap();
    assert_eq!(ping.deployment_status, DeploymentStatus::Pending);
    assert_eq!(ping.last_error.as_deref(), Some("bulk overwrite rejected"));
    let kick = repo.find_live("kick", CommandScope::Global).await?.unwrap();
    assert_eq!(kick.deployment_status, DeploymentStatus::Failed);
    let guild = repo.find_live("ping", CommandScope::Guild(9)).await?.unwrap();
    assert_eq!(guild.deployment_status, DeploymentStatus::Failed);

    Ok(())
}
