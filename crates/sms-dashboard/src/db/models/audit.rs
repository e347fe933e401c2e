//! Audit log model.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One recorded admin or public action.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditEntry {
    pub id: i64,
    pub action: String,
    pub meta: String,
    pub created_at: NaiveDateTime,
}
