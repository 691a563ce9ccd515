mod model;
mod server;

use std::{net::SocketAddr, sync::Arc};

use tracing_subscriber::EnvFilter;

use crate::server::{
    bot, config::Config, error::AppError, registry::DiscordRegistry,
    service::cache::CommandCache, startup, state::AppState,
};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "cmdhub=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    let cache = CommandCache::new(config.cache_enabled);

    tracing::info!("Starting server");

    // Initialize Discord bot and extract HTTP client
    let (bot_client, discord_http) =
        bot::start::init_bot(&config, db.clone(), cache.clone()).await?;

    // Start Discord bot in a separate task
    tokio::spawn(async move {
        if let Err(e) = bot::start::start_bot(bot_client).await {
            tracing::error!("Discord bot error: {}", e);
        }
    });

    let registry = Arc::new(DiscordRegistry::new(discord_http));
    let state = AppState::new(db, cache, registry, &config.admin_api_token);
    let router = startup::build_router(state)?;

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!("Listening on {}", config.bind_address);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
