use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::auth;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AuditQuery {
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct AuditEntryResponse {
    id: String,
    actor_id: i64,
    action: String,
    entity: String,
    entity_id: String,
    detail: Option<String>,
    created_at: String,
}

// GET /audit
pub async fn list_audit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<AuditQuery>,
) -> Result<Json<Vec<AuditEntryResponse>>, AppError> {
    let db = state.db.lock().unwrap();
    let ctx = auth::authenticate(&db, &headers)?;
    auth::require_admin(&ctx)?;

    let limit = query.limit.unwrap_or(100);
    let entries = queries::list_audit_entries(&db, limit)?;
    Ok(Json(
        entries
            .into_iter()
            .map(|e| AuditEntryResponse {
                id: e.id,
                actor_id: e.actor_id,
                action: e.action,
                entity: e.entity,
                entity_id: e.entity_id,
                detail: e.detail,
                created_at: e.created_at,
            })
            .collect(),
    ))
}
