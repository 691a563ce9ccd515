//! Ready event handler for bot initialization.
//!
//! The ready payload carries the bot's application ID. It is stored on the shared HTTP
//! client so the command registry can address the application's commands even when no
//! application ID was configured.

use serenity::all::{Context, Ready};

/// Handles the ready event when the bot connects to Discord.
///
/// # Arguments
/// - `ctx` - Discord context holding the shared HTTP client
/// - `ready` - Ready event data containing bot user and application information
pub async fn handle_ready(ctx: Context, ready: Ready) {
    ctx.http.set_application_id(ready.application.id);

    tracing::info!(
        "{} is connected to Discord as application {}",
        ready.user.name,
        ready.application.id
    );
}
