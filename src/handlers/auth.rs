use axum::http::HeaderMap;
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::RequestContext;

/// Resolve the bearer token to a user row and build the request context
/// every service call receives. Token issuance lives outside this
/// service; tokens are provisioned directly in the users table.
pub fn authenticate(conn: &Connection, headers: &HeaderMap) -> Result<RequestContext, AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token.is_empty() {
        return Err(AppError::Unauthorized);
    }

    match queries::get_user_by_token(conn, token)? {
        Some(user) => Ok(RequestContext {
            user_id: user.id,
            role: user.role,
        }),
        None => Err(AppError::Unauthorized),
    }
}

pub fn require_admin(ctx: &RequestContext) -> Result<(), AppError> {
    if ctx.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
