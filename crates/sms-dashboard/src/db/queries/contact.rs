//! Contact queries.

use sqlx::SqliteExecutor;

use crate::db::models::Contact;
use crate::error::AppResult;

const CONTACT_COLUMNS: &str = "id, name, phone, consented, opted_out, tags, created_at";

/// Insert a contact or refresh an existing one with the same phone.
///
/// Name and tags are overwritten. Consent only ever moves from 0 to 1 and
/// `opted_out` is left untouched.
pub async fn upsert<'e, E: SqliteExecutor<'e>>(
    executor: E,
    name: &str,
    phone: &str,
    tags: &str,
    consented: bool,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO contacts (name, phone, tags, consented)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(phone) DO UPDATE SET
          name = excluded.name,
          tags = excluded.tags,
          consented = MAX(contacts.consented, excluded.consented)
        "#,
    )
    .bind(name)
    .bind(phone)
    .bind(tags)
    .bind(consented)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn get_by_phone<'e, E: SqliteExecutor<'e>>(
    executor: E,
    phone: &str,
) -> AppResult<Option<Contact>> {
    let contact = sqlx::query_as::<_, Contact>(&format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts WHERE phone = ?1"
    ))
    .bind(phone)
    .fetch_optional(executor)
    .await?;

    Ok(contact)
}

/// Most recently created contacts, newest first.
pub async fn list_recent<'e, E: SqliteExecutor<'e>>(
    executor: E,
    limit: i64,
) -> AppResult<Vec<Contact>> {
    let contacts = sqlx::query_as::<_, Contact>(&format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY created_at DESC, id DESC LIMIT ?1"
    ))
    .bind(limit)
    .fetch_all(executor)
    .await?;

    Ok(contacts)
}

/// Contacts that have consented and not opted out, oldest first.
pub async fn list_reachable<'e, E: SqliteExecutor<'e>>(executor: E) -> AppResult<Vec<Contact>> {
    let contacts = sqlx::query_as::<_, Contact>(&format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts WHERE consented = 1 AND opted_out = 0 ORDER BY id"
    ))
    .fetch_all(executor)
    .await?;

    Ok(contacts)
}

/// Mark a contact as opted out. Returns the number of rows touched.
pub async fn opt_out_by_id<'e, E: SqliteExecutor<'e>>(executor: E, id: i64) -> AppResult<u64> {
    let result = sqlx::query("UPDATE contacts SET opted_out = 1 WHERE id = ?1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

/// Mark every contact with this phone as opted out.
pub async fn opt_out_by_phone<'e, E: SqliteExecutor<'e>>(
    executor: E,
    phone: &str,
) -> AppResult<u64> {
    let result = sqlx::query("UPDATE contacts SET opted_out = 1 WHERE phone = ?1")
        .bind(phone)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

pub async fn count_all<'e, E: SqliteExecutor<'e>>(executor: E) -> AppResult<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contacts")
        .fetch_one(executor)
        .await?;
    Ok(n)
}

pub async fn count_opted_out<'e, E: SqliteExecutor<'e>>(executor: E) -> AppResult<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contacts WHERE opted_out = 1")
        .fetch_one(executor)
        .await?;
    Ok(n)
}
