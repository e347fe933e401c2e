//! Campaign database model.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Campaign row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Campaign {
    pub id: i64,
    pub name: String,

    /// Body template with `{{name}}`, `{{phone}}` and `{{tags}}` placeholders
    pub message_template: String,

    /// Tag recipients must carry; empty targets every reachable contact
    pub target_tag: String,

    pub created_at: NaiveDateTime,
    pub started_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
}

impl Campaign {
    /// Started campaigns cannot be started again.
    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Human readable lifecycle state for the views.
    pub fn state(&self) -> &'static str {
        if !self.is_started() {
            "draft"
        } else if self.completed_at.is_none() {
            "sending"
        } else {
            "completed"
        }
    }
}

/// Fields accepted from the create form.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCampaign {
    pub name: String,
    pub message_template: String,
    #[serde(default)]
    pub target_tag: String,
}
