//! Audit log queries.

use sqlx::SqliteExecutor;

use crate::db::models::AuditEntry;
use crate::error::AppResult;

/// Append an audit entry.
pub async fn insert<'e, E: SqliteExecutor<'e>>(
    executor: E,
    action: &str,
    meta: &str,
) -> AppResult<()> {
    sqlx::query("INSERT INTO audit_log (action, meta) VALUES (?1, ?2)")
        .bind(action)
        .bind(meta)
        .execute(executor)
        .await?;

    Ok(())
}

/// Most recent audit entries, newest first.
pub async fn list_recent<'e, E: SqliteExecutor<'e>>(
    executor: E,
    limit: i64,
) -> AppResult<Vec<AuditEntry>> {
    let entries = sqlx::query_as::<_, AuditEntry>(
        r#"
        SELECT id, action, meta, created_at
        FROM audit_log
        ORDER BY created_at DESC, id DESC
        LIMIT ?1
        "#,
    )
    .bind(limit)
    .fetch_all(executor)
    .await?;

    Ok(entries)
}
