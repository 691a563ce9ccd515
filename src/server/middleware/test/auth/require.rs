use super::*;

/// Tests a valid token without an operator header resolves to the default operator.
///
/// Expected: Ok(Operator("dashboard"))
#[test]
fn accepts_valid_token_with_default_operator() {
    let headers = headers(Some("Bearer s3cret-token"), None);

    let operator = AuthGuard::new(TOKEN, &headers).require().unwrap();

    assert_eq!(operator, Operator(DEFAULT_OPERATOR.to_string()));
}

/// Tests the operator header is recorded when present.
///
/// Expected: Ok(Operator("alice"))
#[test]
fn uses_operator_header() {
    let headers = headers(Some("Bearer s3cret-token"), Some(" alice "));

    let operator = AuthGuard::new(TOKEN, &headers).require().unwrap();

    assert_eq!(operator.into_name(), "alice");
}

/// Tests requests without a bearer token are rejected.
///
/// Expected: Err(AuthError::MissingToken)
#[test]
fn rejects_missing_token() {
    for authorization in [None, Some("Basic abc"), Some("Bearer ")] {
        let headers = headers(authorization, None);

        let result = AuthGuard::new(TOKEN, &headers).require();

        assert!(matches!(
            result,
            Err(AppError::AuthErr(AuthError::MissingToken))
        ));
    }
}

/// Tests a wrong token is rejected.
///
/// Expected: Err(AuthError::InvalidToken)
#[test]
fn rejects_invalid_token() {
    for authorization in ["Bearer s3cret-toke", "Bearer s3cret-token2", "Bearer S3CRET-TOKEN"] {
        let headers = headers(Some(authorization), None);

        let result = AuthGuard::new(TOKEN, &headers).require();

        assert!(matches!(
            result,
            Err(AppError::AuthErr(AuthError::InvalidToken))
        ));
    }
}

/// Tests an unconfigured (empty) token never authenticates.
///
/// Expected: Err(AuthError::InvalidToken)
#[test]
fn rejects_when_no_token_configured() {
    let headers = headers(Some("Bearer anything"), None);

    let result = AuthGuard::new("", &headers).require();

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::InvalidToken))
    ));
}
