use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::ErrorDto,
        command::{
            CommandDto, CommandStatsDto, CreateCommandDto, ListCommandsQuery, RecordUsageDto,
            ScopeQuery, UpdateCommandDto,
        },
        reconcile::RestoreResultDto,
    },
    server::{
        error::AppError,
        middleware::auth::AuthGuard,
        model::command::{CommandFilter, CommandScope, CreateCommandParam, UpdateCommandParam},
        service::{command::CommandService, reconcile::ReconciliationService},
        state::AppState,
    },
};

/// Tag for grouping command endpoints in OpenAPI documentation
pub static COMMAND_TAG: &str = "command";

/// List commands.
///
/// Returns live commands by default, optionally filtered by category, enabled flag and
/// guild. With `deleted=true` only soft-deleted commands are returned.
///
/// # Access Control
/// - Admin API token
///
/// # Returns
/// - `200 OK` - Matching commands ordered by scope and name
/// - `400 Bad Request` - Unknown category or malformed guild ID
/// - `401 Unauthorized` - Missing or invalid token
#[utoipa::path(
    get,
    path = "/api/commands",
    tag = COMMAND_TAG,
    params(ListCommandsQuery),
    responses(
        (status = 200, description = "Successfully retrieved commands", body = Vec<CommandDto>),
        (status = 400, description = "Invalid filter", body = ErrorDto),
        (status = 401, description = "Missing or invalid admin API token", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_commands(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListCommandsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.admin_api_token, &headers).require()?;

    let service = CommandService::new(&state.db, &state.cache);
    let filter = CommandFilter::from_query(query)?;

    let commands = service.list(filter).await?;
    let dtos: Vec<CommandDto> = commands.into_iter().map(|c| c.into_dto()).collect();

    Ok((StatusCode::OK, Json(dtos)))
}

/// Get a live command by name.
///
/// # Access Control
/// - Admin API token
///
/// # Returns
/// - `200 OK` - The command
/// - `404 Not Found` - No live command with that name in the scope
#[utoipa::path(
    get,
    path = "/api/commands/{name}",
    tag = COMMAND_TAG,
    params(
        ("name" = String, Path, description = "Command name"),
        ScopeQuery
    ),
    responses(
        (status = 200, description = "Successfully retrieved command", body = CommandDto),
        (status = 401, description = "Missing or invalid admin API token", body = ErrorDto),
        (status = 404, description = "Command not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_command(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(name): Path<String>,
    Query(query): Query<ScopeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.admin_api_token, &headers).require()?;

    let service = CommandService::new(&state.db, &state.cache);
    let scope = CommandScope::from_guild_id(query.guild_id.as_deref())?;

    let command = service.get_by_name(&name, scope).await?;

    Ok((StatusCode::OK, Json(command.into_dto())))
}

/// Create a new command.
///
/// The command starts in status `pending` and reaches Discord on the next deploy of its
/// scope.
///
/// # Access Control
/// - Admin API token; `X-Operator` is recorded as the creator
///
/// # Returns
/// - `201 Created` - Successfully created command
/// - `400 Bad Request` - Invalid name, description, category, options or permissions
/// - `409 Conflict` - A live command with the same name exists in the scope
#[utoipa::path(
    post,
    path = "/api/commands",
    tag = COMMAND_TAG,
    request_body = CreateCommandDto,
    responses(
        (status = 201, description = "Successfully created command", body = CommandDto),
        (status = 400, description = "Invalid command data", body = ErrorDto),
        (status = 401, description = "Missing or invalid admin API token", body = ErrorDto),
        (status = 409, description = "Command already exists in scope", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_command(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateCommandDto>,
) -> Result<impl IntoResponse, AppError> {
    let operator = AuthGuard::new(&state.admin_api_token, &headers).require()?;

    let service = CommandService::new(&state.db, &state.cache);

    // Convert DTO to server model
    let param = CreateCommandParam::from_dto(payload, operator.into_name())?;

    let command = service.create(param).await?;

    Ok((StatusCode::CREATED, Json(command.into_dto())))
}

/// Update a live command.
///
/// Merges the provided fields, bumps the version and marks the command `outdated`.
/// Limited to 5 updates per command per hour.
///
/// # Access Control
/// - Admin API token; `X-Operator` is recorded as the updater
///
/// # Returns
/// - `200 OK` - Successfully updated command
/// - `404 Not Found` - No live command with that name in the scope
/// - `429 Too Many Requests` - Update quota for this command is exhausted
#[utoipa::path(
    put,
    path = "/api/commands/{name}",
    tag = COMMAND_TAG,
    params(
        ("name" = String, Path, description = "Command name"),
        ScopeQuery
    ),
    request_body = UpdateCommandDto,
    responses(
        (status = 200, description = "Successfully updated command", body = CommandDto),
        (status = 400, description = "Invalid command data", body = ErrorDto),
        (status = 401, description = "Missing or invalid admin API token", body = ErrorDto),
        (status = 404, description = "Command not found", body = ErrorDto),
        (status = 429, description = "Update rate limit exceeded", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_command(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(name): Path<String>,
    Query(query): Query<ScopeQuery>,
    Json(payload): Json<UpdateCommandDto>,
) -> Result<impl IntoResponse, AppError> {
    let operator = AuthGuard::new(&state.admin_api_token, &headers).require()?;

    let service = CommandService::new(&state.db, &state.cache);
    let scope = CommandScope::from_guild_id(query.guild_id.as_deref())?;

    let param = UpdateCommandParam::from_dto(name, scope, payload, operator.into_name())?;

    let command = service.update(param).await?;

    Ok((StatusCode::OK, Json(command.into_dto())))
}

/// Flip the enabled flag of a live command.
///
/// # Access Control
/// - Admin API token
///
/// # Returns
/// - `200 OK` - The toggled command, now `outdated`
/// - `404 Not Found` - No live command with that name in the scope
#[utoipa::path(
    patch,
    path = "/api/commands/{name}/toggle",
    tag = COMMAND_TAG,
    params(
        ("name" = String, Path, description = "Command name"),
        ScopeQuery
    ),
    responses(
        (status = 200, description = "Successfully toggled command", body = CommandDto),
        (status = 401, description = "Missing or invalid admin API token", body = ErrorDto),
        (status = 404, description = "Command not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn toggle_command(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(name): Path<String>,
    Query(query): Query<ScopeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let operator = AuthGuard::new(&state.admin_api_token, &headers).require()?;

    let service = CommandService::new(&state.db, &state.cache);
    let scope = CommandScope::from_guild_id(query.guild_id.as_deref())?;

    let command = service.toggle(&name, scope, operator.into_name()).await?;

    Ok((StatusCode::OK, Json(command.into_dto())))
}

/// Soft delete a live command.
///
/// The remote registration stays in place until the next deploy of the scope or an
/// explicit removal from Discord.
///
/// # Access Control
/// - Admin API token
///
/// # Returns
/// - `200 OK` - The deleted command
/// - `404 Not Found` - No live command with that name in the scope
#[utoipa::path(
    delete,
    path = "/api/commands/{name}",
    tag = COMMAND_TAG,
    params(
        ("name" = String, Path, description = "Command name"),
        ScopeQuery
    ),
    responses(
        (status = 200, description = "Successfully deleted command", body = CommandDto),
        (status = 401, description = "Missing or invalid admin API token", body = ErrorDto),
        (status = 404, description = "Command not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_command(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(name): Path<String>,
    Query(query): Query<ScopeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let operator = AuthGuard::new(&state.admin_api_token, &headers).require()?;

    let service = CommandService::new(&state.db, &state.cache);
    let scope = CommandScope::from_guild_id(query.guild_id.as_deref())?;

    let command = service
        .soft_delete(&name, scope, operator.into_name())
        .await?;

    Ok((StatusCode::OK, Json(command.into_dto())))
}

/// Restore the most recently deleted command with the given name.
///
/// A restored command without a remote identifier is deployed to its scope right away.
/// A failed deploy still restores the command and reports the error in the body.
///
/// # Access Control
/// - Admin API token
///
/// # Returns
/// - `200 OK` - The restored command and the deploy outcome
/// - `404 Not Found` - No deleted command with that name in the scope
/// - `409 Conflict` - A live command with the same name exists in the scope
#[utoipa::path(
    post,
    path = "/api/commands/{name}/restore",
    tag = COMMAND_TAG,
    params(
        ("name" = String, Path, description = "Command name"),
        ScopeQuery
    ),
    responses(
        (status = 200, description = "Successfully restored command", body = RestoreResultDto),
        (status = 401, description = "Missing or invalid admin API token", body = ErrorDto),
        (status = 404, description = "Deleted command not found", body = ErrorDto),
        (status = 409, description = "Command already exists in scope", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn restore_command(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(name): Path<String>,
    Query(query): Query<ScopeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let operator = AuthGuard::new(&state.admin_api_token, &headers).require()?;

    let service =
        ReconciliationService::new(&state.db, &state.cache, state.registry.as_ref());
    let scope = CommandScope::from_guild_id(query.guild_id.as_deref())?;

    let outcome = service.restore(&name, scope, operator.into_name()).await?;

    Ok((StatusCode::OK, Json(outcome.into_dto())))
}

/// Record one invocation of a live command.
///
/// Entry point for dispatchers running outside this process; the built-in bot records
/// usage directly.
///
/// # Access Control
/// - Admin API token
///
/// # Returns
/// - `200 OK` - The command with updated usage counters
/// - `404 Not Found` - No live command with that name in the scope
#[utoipa::path(
    post,
    path = "/api/commands/{name}/usage",
    tag = COMMAND_TAG,
    params(
        ("name" = String, Path, description = "Command name")
    ),
    request_body = RecordUsageDto,
    responses(
        (status = 200, description = "Successfully recorded usage", body = CommandDto),
        (status = 400, description = "Malformed guild ID", body = ErrorDto),
        (status = 401, description = "Missing or invalid admin API token", body = ErrorDto),
        (status = 404, description = "Command not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn record_usage(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(name): Path<String>,
    Json(payload): Json<RecordUsageDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.admin_api_token, &headers).require()?;

    let service = CommandService::new(&state.db, &state.cache);
    let scope = CommandScope::from_guild_id(payload.guild_id.as_deref())?;
    let invoked_guild_id = payload
        .invoked_guild_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());

    let command = service.record_usage(&name, scope, invoked_guild_id).await?;

    Ok((StatusCode::OK, Json(command.into_dto())))
}

/// Aggregate counts over every stored command.
///
/// # Access Control
/// - Admin API token
///
/// # Returns
/// - `200 OK` - Totals by state, status and category plus total usage
#[utoipa::path(
    get,
    path = "/api/commands/stats",
    tag = COMMAND_TAG,
    responses(
        (status = 200, description = "Successfully computed stats", body = CommandStatsDto),
        (status = 401, description = "Missing or invalid admin API token", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.admin_api_token, &headers).require()?;

    let service = CommandService::new(&state.db, &state.cache);

    let stats = service.stats().await?;

    Ok((StatusCode::OK, Json(stats.into_dto())))
}
