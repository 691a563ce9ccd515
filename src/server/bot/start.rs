use serenity::all::{ApplicationId, Client, GatewayIntents};
use serenity::http::Http;
use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::server::{
    bot::handler::Handler, config::Config, error::AppError, service::cache::CommandCache,
};

/// Builds the Discord client without connecting it.
///
/// The returned HTTP client is shared with the command registry. When the application ID
/// is configured it is set up front; otherwise the `ready` event provides it.
///
/// # Arguments
/// - `config` - Application configuration with the bot token
/// - `db` - Database connection for the event handler
/// - `cache` - Command cache invalidated when usage is recorded
///
/// # Returns
/// - `Ok((Client, Arc<Http>))` - Client to start and its shared HTTP client
/// - `Err(AppError::DiscordErr)` - The client could not be built
pub async fn init_bot(
    config: &Config,
    db: DatabaseConnection,
    cache: CommandCache,
) -> Result<(Client, Arc<Http>), AppError> {
    let intents = GatewayIntents::GUILDS;

    let handler = Handler::new(db, cache);

    let mut builder = Client::builder(&config.discord_bot_token, intents).event_handler(handler);
    if let Some(application_id) = config.discord_application_id {
        builder = builder.application_id(ApplicationId::new(application_id));
    }

    let client = builder.await?;
    let http = client.http.clone();

    Ok((client, http))
}

/// Runs the gateway connection until it shuts down.
///
/// Call from a spawned task; this only returns when the connection ends.
pub async fn start_bot(mut client: Client) -> Result<(), AppError> {
    tracing::info!("Starting Discord bot...");

    client.start().await?;

    Ok(())
}
