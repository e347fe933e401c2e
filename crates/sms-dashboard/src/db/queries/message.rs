//! Message queue queries.

use sqlx::SqliteExecutor;

use crate::db::models::{Message, MessageStatus, QueuedMessage, StatusCount};
use crate::error::AppResult;

/// Queue one message for a campaign recipient.
pub async fn enqueue<'e, E: SqliteExecutor<'e>>(
    executor: E,
    campaign_id: i64,
    contact_id: i64,
    to_phone: &str,
    body: &str,
) -> AppResult<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO messages (campaign_id, contact_id, to_phone, body, status)
        VALUES (?1, ?2, ?3, ?4, 'queued')
        "#,
    )
    .bind(campaign_id)
    .bind(contact_id)
    .bind(to_phone)
    .bind(body)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Oldest queued messages with their recipient's current consent flags.
pub async fn fetch_queued<'e, E: SqliteExecutor<'e>>(
    executor: E,
    limit: i64,
) -> AppResult<Vec<QueuedMessage>> {
    let rows = sqlx::query_as::<_, QueuedMessage>(
        r#"
        SELECT m.id, m.campaign_id, m.contact_id, m.to_phone, m.body,
               c.consented, c.opted_out
        FROM messages m
        JOIN contacts c ON c.id = m.contact_id
        WHERE m.status = 'queued'
        ORDER BY m.created_at ASC, m.id ASC
        LIMIT ?1
        "#,
    )
    .bind(limit)
    .fetch_all(executor)
    .await?;

    Ok(rows)
}

/// Messages delivered to a contact since midnight UTC.
pub async fn count_sent_today<'e, E: SqliteExecutor<'e>>(
    executor: E,
    contact_id: i64,
) -> AppResult<i64> {
    let n: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM messages
        WHERE contact_id = ?1 AND status = 'sent' AND date(sent_at) = date('now')
        "#,
    )
    .bind(contact_id)
    .fetch_one(executor)
    .await?;

    Ok(n)
}

/// Move a message out of `queued`/`sending` into `skipped` or `failed`.
pub async fn mark_finished_with_error<'e, E: SqliteExecutor<'e>>(
    executor: E,
    id: i64,
    status: MessageStatus,
    error: &str,
) -> AppResult<()> {
    sqlx::query("UPDATE messages SET status = ?1, error = ?2 WHERE id = ?3")
        .bind(status.as_str())
        .bind(error)
        .bind(id)
        .execute(executor)
        .await?;

    Ok(())
}

/// Claim a queued message for sending.
///
/// Returns `false` if the message is no longer queued.
pub async fn mark_sending<'e, E: SqliteExecutor<'e>>(executor: E, id: i64) -> AppResult<bool> {
    let result =
        sqlx::query("UPDATE messages SET status = 'sending' WHERE id = ?1 AND status = 'queued'")
            .bind(id)
            .execute(executor)
            .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn mark_sent<'e, E: SqliteExecutor<'e>>(
    executor: E,
    id: i64,
    provider_id: &str,
) -> AppResult<()> {
    sqlx::query(
        r#"
        UPDATE messages
        SET status = 'sent', provider_id = ?1, sent_at = datetime('now'), error = NULL
        WHERE id = ?2
        "#,
    )
    .bind(provider_id)
    .bind(id)
    .execute(executor)
    .await?;

    Ok(())
}

/// Fail every message stuck in `sending`. Returns how many were touched.
pub async fn fail_interrupted<'e, E: SqliteExecutor<'e>>(
    executor: E,
    error: &str,
) -> AppResult<u64> {
    let result =
        sqlx::query("UPDATE messages SET status = 'failed', error = ?1 WHERE status = 'sending'")
            .bind(error)
            .execute(executor)
            .await?;

    Ok(result.rows_affected())
}

/// Latest messages of a campaign, newest first.
pub async fn list_for_campaign<'e, E: SqliteExecutor<'e>>(
    executor: E,
    campaign_id: i64,
    limit: i64,
) -> AppResult<Vec<Message>> {
    let messages = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, campaign_id, contact_id, to_phone, body, status, provider_id, error,
               created_at, sent_at
        FROM messages
        WHERE campaign_id = ?1
        ORDER BY created_at DESC, id DESC
        LIMIT ?2
        "#,
    )
    .bind(campaign_id)
    .bind(limit)
    .fetch_all(executor)
    .await?;

    Ok(messages)
}

/// Message counts per status, across all campaigns or just one.
pub async fn count_by_status<'e, E: SqliteExecutor<'e>>(
    executor: E,
    campaign_id: Option<i64>,
) -> AppResult<Vec<StatusCount>> {
    let counts = sqlx::query_as::<_, StatusCount>(
        r#"
        SELECT status, COUNT(*) AS n
        FROM messages
        WHERE ?1 IS NULL OR campaign_id = ?1
        GROUP BY status
        ORDER BY status
        "#,
    )
    .bind(campaign_id)
    .fetch_all(executor)
    .await?;

    Ok(counts)
}
