//! Application state shared across all request handlers.
//!
//! This module defines the `AppState` struct which holds all shared resources and
//! dependencies needed by the application. The state is initialized once during startup
//! and then cloned for each request handler through Axum's state extraction.
//!
//! The state includes:
//! - Database connection pool for data persistence
//! - Command cache shared with the Discord bot
//! - Command registry client backed by the bot's Discord HTTP client
//! - Admin API token used to authenticate dashboard requests

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::server::{registry::CommandRegistry, service::cache::CommandCache};

/// Application state containing shared resources and dependencies.
///
/// All fields are cheap to clone:
/// - `DatabaseConnection` is a connection pool (clones share the pool)
/// - `CommandCache` shares its map through an `Arc`
/// - `Arc<dyn CommandRegistry>` and `Arc<str>` are reference-counted pointers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for accessing persistent storage.
    pub db: DatabaseConnection,

    /// Read-through cache for command list and detail queries.
    pub cache: CommandCache,

    /// Remote command registry used by sync, deploy and orphan removal.
    pub registry: Arc<dyn CommandRegistry>,

    /// Bearer token expected on every admin API request.
    pub admin_api_token: Arc<str>,
}

impl AppState {
    /// Creates a new application state with the provided dependencies.
    ///
    /// # Arguments
    /// - `db` - Database connection pool
    /// - `cache` - Command cache, shared with the bot's event handler
    /// - `registry` - Command registry client
    /// - `admin_api_token` - Bearer token for the admin API
    ///
    /// # Returns
    /// - `AppState` - Initialized application state ready for use
    pub fn new(
        db: DatabaseConnection,
        cache: CommandCache,
        registry: Arc<dyn CommandRegistry>,
        admin_api_token: &str,
    ) -> Self {
        Self {
            db,
            cache,
            registry,
            admin_api_token: Arc::from(admin_api_token),
        }
    }
}
