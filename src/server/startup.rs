use std::{sync::Arc, time::Duration};

use axum::Router;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::server::{config::Config, error::AppError, router, state::AppState};

/// Seconds between two requests replenishing a client's admin API quota.
const REQUEST_REPLENISH_SECONDS: u64 = 1;

/// Requests a single client may burst before being throttled.
const REQUEST_BURST_SIZE: u32 = 30;

/// How often idle per-client throttling state is dropped.
const THROTTLE_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Connects to the Sqlite database and runs pending migrations.
///
/// Establishes a connection pool to the Sqlite database using the connection string from
/// configuration, then automatically runs all pending SeaORM migrations to ensure the database
/// schema is up-to-date. This function must complete successfully before the application can
/// access the database.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(Error)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<sea_orm::DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Builds the HTTP application with tracing, CORS and per-IP throttling.
///
/// Throttling keys on the peer address, so the router must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
///
/// # Arguments
/// - `state` - Shared application state handed to every handler
///
/// # Returns
/// - `Ok(Router)` - Router ready to be served
/// - `Err(AppError::InternalError)` - Throttling configuration was rejected
pub fn build_router(state: AppState) -> Result<Router, AppError> {
    let governor_config = GovernorConfigBuilder::default()
        .per_second(REQUEST_REPLENISH_SECONDS)
        .burst_size(REQUEST_BURST_SIZE)
        .finish()
        .ok_or_else(|| AppError::InternalError("Invalid request throttling config".to_string()))?;
    let governor_config = Arc::new(governor_config);

    let limiter = governor_config.limiter().clone();
    std::thread::spawn(move || loop {
        std::thread::sleep(THROTTLE_CLEANUP_INTERVAL);
        tracing::debug!("Request throttling state size: {}", limiter.len());
        limiter.retain_recent();
    });

    let router = router::router()
        .with_state(state)
        .layer(GovernorLayer::new(governor_config))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    Ok(router)
}
