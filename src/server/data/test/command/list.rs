use super::*;

/// Tests that listing excludes soft-deleted commands by default.
///
/// Expected: Ok with only the live command
#[tokio::test]
async fn excludes_deleted_commands() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_command_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    CommandFactory::new(db).name("ping").build().await?;
    CommandFactory::new(db).name("old").deleted().build().await?;

    let repo = CommandRepository::new(db);
    let commands = repo.list(&CommandFilter::default()).await?;

    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].name, "ping");

    Ok(())
}

/// Tests that the deleted filter returns only soft-deleted commands.
///
/// Expected: Ok with only the deleted command
#[tokio::test]
async fn lists_only_deleted_when_requested() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_command_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    CommandFactory::new(db).name("ping").build().await?;
    CommandFactory::new(db).name("old").deleted().build().await?;

    let repo = CommandRepository::new(db);
    let commands = repo
        .list(&CommandFilter {
            deleted: true,
            ..Default::default()
        })
        .await?;

    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].name, "old");
    assert!(commands[0].is_deleted());

    Ok(())
}

/// Tests combining category, enabled and scope filters.
///
/// Expected: Ok with only the command matching every filter
#[tokio::test]
async fn applies_category_enabled_and_scope_filters() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_command_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    CommandFactory::new(db).name("kick").category("moderation").guild_id("7").build().await?;
    CommandFactory::new(db)
        .name("ban")
        .category("moderation")
        .guild_id("7")
        .enabled(false)
        .build()
        .await?;
    CommandFactory::new(db).name("warn").category("moderation").build().await?;
    CommandFactory::new(db).name("joke").category("fun").guild_id("7").build().await?;

    let repo = CommandRepository::new(db);
    let commands = repo
        .list(&CommandFilter {
            category: Some(CommandCategory::Moderation),
            enabled: Some(true),
            scope: Some(CommandScope::Guild(7)),
            deleted: false,
        })
        .await?;

    let names: Vec<_> = commands.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["kick"]);

    Ok(())
}
