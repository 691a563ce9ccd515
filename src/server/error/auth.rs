use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum AuthError {
    /// The request carried no `Authorization: Bearer` header.
    #[error("Missing admin API token")]
    MissingToken,

    /// The bearer token does not match the configured admin API token.
    #[error("Invalid admin API token")]
    InvalidToken,
}

/// Converts authentication errors into 401 Unauthorized responses.
///
/// Both variants share one client-facing message so the response doesn't reveal whether a
/// token was supplied.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("Rejected admin API request: {}", self);

        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorDto::new("Unauthorized")),
        )
            .into_response()
    }
}
