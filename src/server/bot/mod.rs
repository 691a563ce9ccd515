//! Discord gateway client.
//!
//! The bot connects to the gateway so that slash-command invocations can be counted
//! against their stored commands. It never deploys or syncs anything itself; that happens
//! through the admin API. The bot's HTTP client is shared with the command registry so
//! both use one rate-limited connection to Discord.
//!
//! # Gateway Intents
//!
//! Only `GUILDS` is requested. Interactions are delivered regardless of intents.

pub mod handler;
pub mod start;
