//! Contact database model.
//!
//! A contact is a phone number plus the consent state that decides
//! whether campaigns may message it.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Contact row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contact {
    pub id: i64,

    /// Display name, may be empty
    pub name: String,

    /// Normalized phone number, unique
    pub phone: String,

    /// Explicit opt-in recorded
    pub consented: bool,

    /// Unsubscribed; never cleared by an upsert
    pub opted_out: bool,

    /// Comma separated tags, normalized
    pub tags: String,

    pub created_at: NaiveDateTime,
}

impl Contact {
    /// Case-insensitive exact tag match.
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.trim();
        !wanted.is_empty()
            && self
                .tags
                .split(',')
                .any(|t| t.trim().eq_ignore_ascii_case(wanted))
    }
}

/// Contact fields accepted from the add form and CSV import.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewContact {
    #[serde(default)]
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub consented: bool,
}
