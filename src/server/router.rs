//! Admin API routes and OpenAPI document.

use axum::{
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{
    model::{
        api::ErrorDto,
        command::{CommandDto, CommandStatsDto, CreateCommandDto, RecordUsageDto, UpdateCommandDto},
        rate_limit::{ActionRateLimitDto, RateLimitCounterDto, RateLimitOverviewDto},
        reconcile::{
            DeployReportDto, DeployedCommandDto, OrphanCommandDto, RemoveOrphanDto,
            RemovedOrphanDto, RestoreResultDto, ScopeDto, SyncReportDto,
        },
    },
    server::{
        controller::{command, reconcile},
        state::AppState,
    },
};

#[derive(OpenApi)]
#[openapi(
    info(title = "cmdhub", description = "Discord command registry and reconciliation API"),
    paths(
        command::list_commands,
        command::get_command,
        command::create_command,
        command::update_command,
        command::toggle_command,
        command::delete_command,
        command::restore_command,
        command::record_usage,
        command::get_stats,
        reconcile::sync_commands,
        reconcile::deploy_commands,
        reconcile::remove_orphan,
        reconcile::remove_from_discord,
        reconcile::get_rate_limits,
    ),
    components(schemas(
        ErrorDto,
        CommandDto,
        CreateCommandDto,
        UpdateCommandDto,
        RecordUsageDto,
        CommandStatsDto,
        ScopeDto,
        RemoveOrphanDto,
        OrphanCommandDto,
        SyncReportDto,
        DeployedCommandDto,
        DeployReportDto,
        RemovedOrphanDto,
        RestoreResultDto,
        ActionRateLimitDto,
        RateLimitCounterDto,
        RateLimitOverviewDto,
    )),
    tags(
        (name = "command", description = "Local command store"),
        (name = "reconcile", description = "Synchronization with the Discord command registry")
    )
)]
pub struct ApiDoc;

/// Serves the generated OpenAPI document.
pub async fn openapi() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Builds the admin API routes.
///
/// Fixed segments (`stats`, `rate-limit`, `sync`, `deploy`, `remove-orphan-from-discord`)
/// take precedence over the `{name}` segment.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/openapi.json", get(openapi))
        .route(
            "/api/commands",
            get(command::list_commands).post(command::create_command),
        )
        .route("/api/commands/stats", get(command::get_stats))
        .route("/api/commands/rate-limit", get(reconcile::get_rate_limits))
        .route("/api/commands/sync", post(reconcile::sync_commands))
        .route("/api/commands/deploy", post(reconcile::deploy_commands))
        .route(
            "/api/commands/remove-orphan-from-discord",
            post(reconcile::remove_orphan),
        )
        .route(
            "/api/commands/{name}",
            get(command::get_command)
                .put(command::update_command)
                .delete(command::delete_command),
        )
        .route("/api/commands/{name}/toggle", patch(command::toggle_command))
        .route("/api/commands/{name}/restore", post(command::restore_command))
        .route("/api/commands/{name}/usage", post(command::record_usage))
        .route(
            "/api/commands/{name}/discord",
            delete(reconcile::remove_from_discord),
        )
}
