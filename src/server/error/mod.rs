//! Error types and HTTP response handling.
//!
//! This module provides the application's error hierarchy and conversion logic for
//! transforming errors into appropriate HTTP responses. The `AppError` enum serves
//! as the top-level error type that wraps domain-specific errors and implements
//! `IntoResponse` for automatic error handling in API endpoints.
//!
//! Registry (transport) failures map to 502 and rate-limit denials to 429 so callers can tell
//! "try again in N seconds" apart from "something is broken".

pub mod auth;
pub mod config;
pub mod registry;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{auth::AuthError, config::ConfigError, registry::RegistryError},
};

/// Top-level application error type.
///
/// Aggregates all possible error types that can occur in the application and provides
/// automatic conversion to HTTP responses. Most variants use `#[from]` for automatic
/// error conversion.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Missing or invalid admin API credentials.
    ///
    /// Delegates to `AuthError::into_response()` for the 401 mapping.
    #[error(transparent)]
    AuthErr(#[from] AuthError),

    /// Database operation error from SeaORM.
    ///
    /// Results in 500 Internal Server Error with error details logged server-side.
    #[error(transparent)]
    DbErr(#[from] DbErr),

    /// The command registry could not be reached or rejected the call.
    ///
    /// Results in 502 Bad Gateway.
    #[error(transparent)]
    RegistryErr(#[from] RegistryError),

    /// Discord gateway client error from Serenity.
    ///
    /// Boxed due to large size. Only raised while starting the bot.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// I/O error while binding or serving the HTTP listener.
    #[error(transparent)]
    IoErr(#[from] std::io::Error),

    /// No live command matches the request.
    ///
    /// Results in 404 Not Found with the provided error message.
    #[error("{0}")]
    NotFound(String),

    /// A live command with the same name already exists in the scope.
    ///
    /// Results in 409 Conflict with the provided error message.
    #[error("{0}")]
    Conflict(String),

    /// The action's quota for the current window is exhausted.
    ///
    /// Results in 429 Too Many Requests carrying the remaining quota and reset time.
    #[error("Rate limit exceeded for {action}; try again in {reset_in_seconds} seconds")]
    RateLimited {
        /// Rate-limited action namespace, e.g. `"deploy"`
        action: String,
        /// Attempts left in the window (always 0 when denied)
        remaining: u32,
        /// Seconds until the window resets
        reset_in_seconds: u64,
    },

    /// Malformed name, description, category, scope or options.
    ///
    /// Results in 400 Bad Request with the provided error message.
    #[error("{0}")]
    Validation(String),

    /// Internal server error with custom message.
    ///
    /// Results in 500 Internal Server Error. The provided message is logged
    /// but a generic message is returned to the client.
    #[error("{0}")]
    InternalError(String),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

impl AppError {
    /// Maps a unique-constraint violation to `Conflict`, leaving other database errors intact.
    ///
    /// The live (name, scope) index is the only unique constraint on commands, so any
    /// violation raised by a command write means another live record won the race.
    ///
    /// # Arguments
    /// - `err` - Database error returned by the write
    /// - `message` - Conflict message used when the error is a unique violation
    ///
    /// # Returns
    /// - `AppError::Conflict` - For unique-constraint violations
    /// - `AppError::DbErr` - For every other database error
    pub fn from_unique_violation(err: DbErr, message: impl Into<String>) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(message.into()),
            _ => AppError::DbErr(err),
        }
    }
}

/// Converts application errors into HTTP responses.
///
/// # Returns
/// - 400 Bad Request - For `Validation`
/// - 401 Unauthorized - For `AuthErr`
/// - 404 Not Found - For `NotFound`
/// - 409 Conflict - For `Conflict`
/// - 429 Too Many Requests - For `RateLimited`, with `remaining` and `reset_in_seconds`
/// - 502 Bad Gateway - For `RegistryErr`
/// - 500 Internal Server Error - For all other error types
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::AuthErr(err) => err.into_response(),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, Json(ErrorDto::new(msg))).into_response(),
            Self::Conflict(msg) => (StatusCode::CONFLICT, Json(ErrorDto::new(msg))).into_response(),
            Self::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorDto::new(msg))).into_response()
            }
            Self::RateLimited {
                ref action,
                remaining,
                reset_in_seconds,
            } => {
                tracing::debug!("Rate limit hit for action {}", action);
                let body = ErrorDto {
                    remaining: Some(remaining),
                    reset_in_seconds: Some(reset_in_seconds),
                    ..ErrorDto::new(self.to_string())
                };
                (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response()
            }
            Self::RegistryErr(err) => {
                tracing::warn!("Command registry request failed: {}", err);
                (
                    StatusCode::BAD_GATEWAY,
                    Json(ErrorDto::new(format!("Discord request failed: {}", err))),
                )
                    .into_response()
            }
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorDto::new("Internal server error")),
                )
                    .into_response()
            }
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// Logs the error message and returns a generic "Internal server error" message to the
/// client to avoid leaking implementation details.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto::new("Internal server error")),
        )
            .into_response()
    }
}
