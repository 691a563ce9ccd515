//! Admin API authentication.
//!
//! Every admin endpoint requires `Authorization: Bearer <ADMIN_API_TOKEN>`. The optional
//! `X-Operator` header names the person acting through the dashboard; it is recorded in
//! `created_by`/`updated_by` and defaults to `"dashboard"`.

use axum::http::{header::AUTHORIZATION, HeaderMap};

use crate::server::error::{auth::AuthError, AppError};

/// Header naming the operator behind a request.
pub const OPERATOR_HEADER: &str = "x-operator";

/// Operator recorded when the request does not name one.
pub const DEFAULT_OPERATOR: &str = "dashboard";

/// Authenticated caller of the admin API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator(pub String);

impl Operator {
    pub fn into_name(self) -> String {
        self.0
    }
}

pub struct AuthGuard<'a> {
    expected_token: &'a str,
    headers: &'a HeaderMap,
}

impl<'a> AuthGuard<'a> {
    pub fn new(expected_token: &'a str, headers: &'a HeaderMap) -> Self {
        Self {
            expected_token,
            headers,
        }
    }

    /// Checks the bearer token and resolves the operator.
    ///
    /// # Returns
    /// - `Ok(Operator)` - Token matches; operator from `X-Operator` or the default
    /// - `Err(AuthError::MissingToken)` - No bearer token on the request
    /// - `Err(AuthError::InvalidToken)` - Token doesn't match the configured one
    pub fn require(&self) -> Result<Operator, AppError> {
        let Some(token) = self
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
        else {
            return Err(AuthError::MissingToken.into());
        };

        if self.expected_token.is_empty() || !tokens_match(token, self.expected_token) {
            return Err(AuthError::InvalidToken.into());
        }

        let operator = self
            .headers
            .get(OPERATOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_OPERATOR);

        Ok(Operator(operator.to_string()))
    }
}

/// Compares tokens without short-circuiting on the first differing byte.
fn tokens_match(provided: &str, expected: &str) -> bool {
    let (provided, expected) = (provided.as_bytes(), expected.as_bytes());
    if provided.len() != expected.len() {
        return false;
    }

    provided
        .iter()
        .zip(expected)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}
