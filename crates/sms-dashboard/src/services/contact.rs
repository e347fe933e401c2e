//! Contact service: consent bookkeeping, CSV import and opt-out.

use serde::Serialize;

use crate::db::models::contact::NewContact;
use crate::db::models::Contact;
use crate::db::queries::{audit, contact as queries};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};

/// Contacts shown on the contacts page.
pub const CONTACT_PAGE_LIMIT: i64 = 500;

/// Outcome of a CSV import.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows inserted or updated
    pub imported: usize,
    /// Rows with a phone that failed validation
    pub rejected: usize,
}

/// Normalize a phone number to `+` and digits.
///
/// Spaces, dashes, dots and parentheses are dropped. The result must be an
/// optional leading `+` followed by 6 to 15 digits.
pub fn normalize_phone(raw: &str) -> AppResult<String> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')' | '.'))
        .collect();

    let digits = compact.strip_prefix('+').unwrap_or(&compact);
    if !(6..=15).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(format!(
            "Invalid phone number: '{}'",
            raw.trim()
        )));
    }

    Ok(compact)
}

/// Trim each tag, drop empty ones and rejoin with commas.
pub fn normalize_tags(raw: &str) -> String {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// CSV truthy values for the `consented` column.
fn parse_consent(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y"
    )
}

/// Service for contact operations.
#[derive(Clone)]
pub struct ContactService {
    pool: DbPool,
}

impl ContactService {
    /// Create a new contact service.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Add or refresh a single contact. Returns the normalized phone.
    pub async fn add(&self, contact: NewContact) -> AppResult<String> {
        let phone = normalize_phone(&contact.phone)?;
        let tags = normalize_tags(&contact.tags);

        let mut tx = self.pool.begin().await?;
        queries::upsert(
            &mut *tx,
            contact.name.trim(),
            &phone,
            &tags,
            contact.consented,
        )
        .await?;
        audit::insert(&mut *tx, "contact_added", &phone).await?;
        tx.commit().await?;

        tracing::info!(phone = %phone, consented = contact.consented, "Contact saved");
        Ok(phone)
    }

    /// Import contacts from CSV with a `phone,name,consented,tags` header.
    ///
    /// Column order is free and unknown columns are ignored. Rows without a
    /// phone are skipped silently, rows with an invalid phone are counted as
    /// rejected. The whole file is applied in one transaction.
    pub async fn import_csv(&self, bytes: &[u8]) -> AppResult<ImportSummary> {
        let rows = parse_contacts_csv(bytes)?;
        let mut summary = ImportSummary::default();

        let mut tx = self.pool.begin().await?;
        for row in rows {
            let phone = match normalize_phone(&row.phone) {
                Ok(phone) => phone,
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping CSV row");
                    summary.rejected += 1;
                    continue;
                }
            };
            queries::upsert(
                &mut *tx,
                row.name.trim(),
                &phone,
                &normalize_tags(&row.tags),
                row.consented,
            )
            .await?;
            summary.imported += 1;
        }
        audit::insert(
            &mut *tx,
            "contacts_import_csv",
            &format!("count={}", summary.imported),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(
            imported = summary.imported,
            rejected = summary.rejected,
            "Contacts imported from CSV"
        );
        Ok(summary)
    }

    /// Opt a contact out from the admin UI.
    pub async fn opt_out(&self, id: i64) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        if queries::opt_out_by_id(&mut *tx, id).await? == 0 {
            return Err(AppError::NotFound(format!("Contact {} not found", id)));
        }
        audit::insert(&mut *tx, "contact_optout_admin", &id.to_string()).await?;
        tx.commit().await?;

        tracing::info!(contact_id = id, "Contact opted out by admin");
        Ok(())
    }

    /// Public unsubscribe.
    ///
    /// Unknown numbers succeed as well so the endpoint does not reveal which
    /// numbers are on the list. Returns the phone as it was matched.
    pub async fn unsubscribe(&self, raw_phone: &str) -> AppResult<String> {
        let phone = normalize_phone(raw_phone).unwrap_or_else(|_| raw_phone.trim().to_string());

        let mut tx = self.pool.begin().await?;
        let touched = queries::opt_out_by_phone(&mut *tx, &phone).await?;
        audit::insert(&mut *tx, "contact_optout_public", &phone).await?;
        tx.commit().await?;

        tracing::info!(phone = %phone, matched = touched, "Public unsubscribe");
        Ok(phone)
    }

    /// Latest contacts for the contacts page.
    pub async fn list_recent(&self) -> AppResult<Vec<Contact>> {
        queries::list_recent(&self.pool, CONTACT_PAGE_LIMIT).await
    }
}

/// Parse an uploaded CSV into raw contact rows.
fn parse_contacts_csv(bytes: &[u8]) -> AppResult<Vec<NewContact>> {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim_start_matches('\u{feff}');

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let (phone_col, name_col, consent_col, tags_col) = (
        column("phone"),
        column("name"),
        column("consented"),
        column("tags"),
    );

    let phone_col = phone_col
        .ok_or_else(|| AppError::BadRequest("CSV is missing a 'phone' column".to_string()))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .unwrap_or_default()
                .to_string()
        };

        let phone = field(Some(phone_col));
        if phone.is_empty() {
            continue;
        }
        rows.push(NewContact {
            name: field(name_col),
            phone,
            tags: field(tags_col),
            consented: parse_consent(&field(consent_col)),
        });
    }

    Ok(rows)
}
