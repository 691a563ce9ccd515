use sea_orm::DatabaseConnection;
use serenity::all::{CommandInteraction, Context, Interaction};

use crate::server::{
    model::command::CommandScope, service::cache::CommandCache, service::command::CommandService,
};

/// Records usage for slash-command invocations; other interactions are ignored.
///
/// Responding to the interaction is left to whichever process implements the command.
pub async fn handle_interaction(
    db: &DatabaseConnection,
    cache: &CommandCache,
    _ctx: Context,
    interaction: Interaction,
) {
    let Interaction::Command(command) = interaction else {
        return;
    };

    record_invocation(db, cache, &command).await;
}

async fn record_invocation(
    db: &DatabaseConnection,
    cache: &CommandCache,
    command: &CommandInteraction,
) {
    let name = command.data.name.as_str();
    // Guild the command is registered in, not where it was invoked
    let scope = match command.data.guild_id {
        Some(guild_id) => CommandScope::Guild(guild_id.get()),
        None => CommandScope::Global,
    };
    let invoked_guild_id = command.guild_id.map(|id| id.to_string());

    let service = CommandService::new(db, cache);

    if let Err(e) = service
        .record_usage(name, scope, invoked_guild_id.as_deref())
        .await
    {
        tracing::debug!("Could not record usage of {} in {}: {}", name, scope, e);
    }
}
