//! JSON endpoints for scripts and monitoring.

use axum::{extract::State, Json};

use super::auth::AdminToken;
use crate::db::models::AuditEntry;
use crate::db::queries::audit;
use crate::error::AppResult;
use crate::services::{dashboard_stats, DashboardStats};
use crate::state::AppState;

/// Audit entries returned by `GET /api/audit`.
const AUDIT_LIMIT: i64 = 200;

/// `GET /api/dashboard/stats`
pub async fn stats(
    State(state): State<AppState>,
    _token: AdminToken,
) -> AppResult<Json<DashboardStats>> {
    Ok(Json(dashboard_stats(&state.db).await?))
}

/// `GET /api/audit`
pub async fn audit_log(
    State(state): State<AppState>,
    _token: AdminToken,
) -> AppResult<Json<Vec<AuditEntry>>> {
    Ok(Json(audit::list_recent(&state.db, AUDIT_LIMIT).await?))
}
