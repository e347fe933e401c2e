//! Campaign queries.

use sqlx::SqliteExecutor;

use crate::db::models::Campaign;
use crate::error::AppResult;

const CAMPAIGN_COLUMNS: &str =
    "id, name, message_template, target_tag, created_at, started_at, completed_at";

/// Insert a new campaign and return its id.
pub async fn insert<'e, E: SqliteExecutor<'e>>(
    executor: E,
    name: &str,
    message_template: &str,
    target_tag: &str,
) -> AppResult<i64> {
    let result = sqlx::query(
        "INSERT INTO campaigns (name, message_template, target_tag) VALUES (?1, ?2, ?3)",
    )
    .bind(name)
    .bind(message_template)
    .bind(target_tag)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn get_by_id<'e, E: SqliteExecutor<'e>>(
    executor: E,
    id: i64,
) -> AppResult<Option<Campaign>> {
    let campaign = sqlx::query_as::<_, Campaign>(&format!(
        "SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(campaign)
}

/// Most recently created campaigns, newest first.
pub async fn list_recent<'e, E: SqliteExecutor<'e>>(
    executor: E,
    limit: i64,
) -> AppResult<Vec<Campaign>> {
    let campaigns = sqlx::query_as::<_, Campaign>(&format!(
        "SELECT {CAMPAIGN_COLUMNS} FROM campaigns ORDER BY created_at DESC, id DESC LIMIT ?1"
    ))
    .bind(limit)
    .fetch_all(executor)
    .await?;

    Ok(campaigns)
}

/// Stamp `started_at`, only if the campaign has not been started yet.
///
/// Returns `false` when another request already started it.
pub async fn mark_started<'e, E: SqliteExecutor<'e>>(executor: E, id: i64) -> AppResult<bool> {
    let result = sqlx::query(
        "UPDATE campaigns SET started_at = datetime('now') WHERE id = ?1 AND started_at IS NULL",
    )
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Complete every started campaign that has nothing left in flight.
///
/// Returns the ids of the campaigns completed by this call.
pub async fn complete_drained<'e, E: SqliteExecutor<'e>>(executor: E) -> AppResult<Vec<i64>> {
    let ids: Vec<i64> = sqlx::query_scalar(
        r#"
        UPDATE campaigns
        SET completed_at = datetime('now')
        WHERE started_at IS NOT NULL
          AND completed_at IS NULL
          AND NOT EXISTS (
            SELECT 1 FROM messages m
            WHERE m.campaign_id = campaigns.id
              AND m.status IN ('queued', 'sending')
          )
        RETURNING id
        "#,
    )
    .fetch_all(executor)
    .await?;

    Ok(ids)
}

pub async fn count_all<'e, E: SqliteExecutor<'e>>(executor: E) -> AppResult<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM campaigns")
        .fetch_one(executor)
        .await?;
    Ok(n)
}
