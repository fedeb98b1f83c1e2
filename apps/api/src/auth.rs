use axum::http::HeaderMap;

use crate::errors::AppError;

/// Checks the `Authorization: Bearer <token>` header against the configured
/// internal API token. When no token is configured, auth is disabled and
/// every request passes.
pub fn require_bearer(headers: &HeaderMap, expected: Option<&str>) -> Result<(), AppError> {
    let expected = match expected {
        Some(t) => t,
        None => return Ok(()), // auth disabled
    };

    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = authorization
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized)?;

    if token != expected {
        return Err(AppError::Forbidden);
    }
    Ok(())
}
