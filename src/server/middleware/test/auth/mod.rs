use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue};

use crate::server::{
    error::{auth::AuthError, AppError},
    middleware::auth::{AuthGuard, Operator, DEFAULT_OPERATOR, OPERATOR_HEADER},
};

mod require;

const TOKEN: &str = "s3cret-token";

fn headers(authorization: Option<&str>, operator: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(value) = authorization {
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    }
    if let Some(value) = operator {
        headers.insert(OPERATOR_HEADER, HeaderValue::from_str(value).unwrap());
    }
    headers
}
