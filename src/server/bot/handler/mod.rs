use sea_orm::DatabaseConnection;
use serenity::all::{Context, EventHandler, Interaction, Ready};
use serenity::async_trait;

use crate::server::service::cache::CommandCache;

pub mod interaction;
pub mod ready;

/// Discord bot event handler
pub struct Handler {
    pub db: DatabaseConnection,
    pub cache: CommandCache,
}

impl Handler {
    pub fn new(db: DatabaseConnection, cache: CommandCache) -> Self {
        Self { db, cache }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(ctx, ready).await;
    }

    /// Called for every interaction, including slash-command invocations
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        interaction::handle_interaction(&self.db, &self.cache, ctx, interaction).await;
    }
}
