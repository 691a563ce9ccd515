use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::ErrorDto,
        command::{CommandDto, ScopeQuery},
        rate_limit::RateLimitOverviewDto,
        reconcile::{DeployReportDto, RemoveOrphanDto, RemovedOrphanDto, ScopeDto, SyncReportDto},
    },
    server::{
        error::AppError,
        middleware::auth::AuthGuard,
        model::command::{validate_name, CommandScope},
        service::reconcile::ReconciliationService,
        state::AppState,
    },
};

/// Tag for grouping reconciliation endpoints in OpenAPI documentation
pub static RECONCILE_TAG: &str = "reconcile";

/// Pull the registered commands of a scope and match them against local records.
///
/// Matching commands get their remote identifier and version written back; remote
/// entries without a live local record are reported as orphans and left in place.
/// Limited to 5 syncs per application per hour.
///
/// # Access Control
/// - Admin API token
///
/// # Arguments
/// - `body` - Optional `{"guild_id": ...}`; an empty body syncs global commands
///
/// # Returns
/// - `200 OK` - Matched names and orphans
/// - `429 Too Many Requests` - Sync quota exhausted
/// - `502 Bad Gateway` - Discord could not be reached
#[utoipa::path(
    post,
    path = "/api/commands/sync",
    tag = RECONCILE_TAG,
    request_body(content = Option<ScopeDto>, description = "Scope to sync, global when omitted"),
    responses(
        (status = 200, description = "Successfully synced commands", body = SyncReportDto),
        (status = 400, description = "Malformed scope", body = ErrorDto),
        (status = 401, description = "Missing or invalid admin API token", body = ErrorDto),
        (status = 429, description = "Sync rate limit exceeded", body = ErrorDto),
        (status = 502, description = "Discord request failed", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn sync_commands(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.admin_api_token, &headers).require()?;

    let service =
        ReconciliationService::new(&state.db, &state.cache, state.registry.as_ref());
    let scope = scope_from_body(&body)?;

    let report = service.sync(scope).await?;

    Ok((StatusCode::OK, Json(report.into_dto())))
}

/// Push the desired commands of a scope to Discord.
///
/// Live enabled commands replace the scope's registrations in one bulk overwrite.
/// Remote entries outside the desired set are deleted and disabled commands lose their
/// remote identifier. Limited to 5 deploys per application per hour.
///
/// # Access Control
/// - Admin API token
///
/// # Arguments
/// - `body` - Optional `{"guild_id": ...}`; an empty body deploys global commands
///
/// # Returns
/// - `200 OK` - Deployed commands and cleanup summary
/// - `429 Too Many Requests` - Deploy quota exhausted
/// - `502 Bad Gateway` - Discord rejected the deploy; affected commands are marked `failed`
#[utoipa::path(
    post,
    path = "/api/commands/deploy",
    tag = RECONCILE_TAG,
    request_body(content = Option<ScopeDto>, description = "Scope to deploy, global when omitted"),
    responses(
        (status = 200, description = "Successfully deployed commands", body = DeployReportDto),
        (status = 400, description = "Malformed scope", body = ErrorDto),
        (status = 401, description = "Missing or invalid admin API token", body = ErrorDto),
        (status = 429, description = "Deploy rate limit exceeded", body = ErrorDto),
        (status = 502, description = "Discord request failed", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn deploy_commands(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.admin_api_token, &headers).require()?;

    let service =
        ReconciliationService::new(&state.db, &state.cache, state.registry.as_ref());
    let scope = scope_from_body(&body)?;

    let report = service.deploy(scope).await?;

    Ok((StatusCode::OK, Json(report.into_dto())))
}

/// Delete a remote command by name.
///
/// Meant for orphans reported by sync. Any local record still holding the removed
/// identifier has it cleared.
///
/// # Access Control
/// - Admin API token
///
/// # Returns
/// - `200 OK` - The removed remote entry
/// - `404 Not Found` - No remote command with that name in the scope
/// - `502 Bad Gateway` - Discord request failed
#[utoipa::path(
    post,
    path = "/api/commands/remove-orphan-from-discord",
    tag = RECONCILE_TAG,
    request_body = RemoveOrphanDto,
    responses(
        (status = 200, description = "Successfully removed orphan", body = RemovedOrphanDto),
        (status = 400, description = "Invalid name or scope", body = ErrorDto),
        (status = 401, description = "Missing or invalid admin API token", body = ErrorDto),
        (status = 404, description = "Remote command not found", body = ErrorDto),
        (status = 502, description = "Discord request failed", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn remove_orphan(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<RemoveOrphanDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.admin_api_token, &headers).require()?;

    let service =
        ReconciliationService::new(&state.db, &state.cache, state.registry.as_ref());
    let name = validate_name(&payload.name)?;
    let scope = CommandScope::from_guild_id(payload.guild_id.as_deref())?;

    let removed = service.remove_orphan(&name, scope).await?;

    Ok((StatusCode::OK, Json(removed.into_dto())))
}

/// Remove a command's registration from Discord and clear its remote identifier.
///
/// Works for live commands and, failing that, the most recently deleted record.
///
/// # Access Control
/// - Admin API token
///
/// # Returns
/// - `200 OK` - The command with its remote identifier cleared
/// - `404 Not Found` - No such command, or it isn't registered
/// - `502 Bad Gateway` - Discord request failed
#[utoipa::path(
    delete,
    path = "/api/commands/{name}/discord",
    tag = RECONCILE_TAG,
    params(
        ("name" = String, Path, description = "Command name"),
        ScopeQuery
    ),
    responses(
        (status = 200, description = "Successfully removed command from Discord", body = CommandDto),
        (status = 401, description = "Missing or invalid admin API token", body = ErrorDto),
        (status = 404, description = "Command not found or not registered", body = ErrorDto),
        (status = 502, description = "Discord request failed", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn remove_from_discord(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(name): Path<String>,
    Query(query): Query<ScopeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.admin_api_token, &headers).require()?;

    let service =
        ReconciliationService::new(&state.db, &state.cache, state.registry.as_ref());
    let scope = CommandScope::from_guild_id(query.guild_id.as_deref())?;

    let command = service.remove_from_discord(&name, scope).await?;

    Ok((StatusCode::OK, Json(command.into_dto())))
}

/// Report rate limit quotas.
///
/// # Access Control
/// - Admin API token
///
/// # Returns
/// - `200 OK` - Max attempts, window, per-action state and every open counter
#[utoipa::path(
    get,
    path = "/api/commands/rate-limit",
    tag = RECONCILE_TAG,
    responses(
        (status = 200, description = "Successfully retrieved rate limits", body = RateLimitOverviewDto),
        (status = 401, description = "Missing or invalid admin API token", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_rate_limits(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.admin_api_token, &headers).require()?;

    let service =
        ReconciliationService::new(&state.db, &state.cache, state.registry.as_ref());

    let overview = service.rate_limit_overview().await?;

    Ok((StatusCode::OK, Json(overview.into_dto())))
}

/// Parses the optional scope body of sync and deploy requests.
///
/// # Returns
/// - `Ok(CommandScope::Global)` - Empty body or no guild ID
/// - `Ok(CommandScope::Guild)` - Body names a guild
/// - `Err(AppError::Validation)` - Body is not a scope object or the guild ID is malformed
fn scope_from_body(body: &[u8]) -> Result<CommandScope, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return CommandScope::from_guild_id(None);
    }

    let dto: ScopeDto = serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid request body: {}", e)))?;

    CommandScope::from_guild_id(dto.guild_id.as_deref())
}
