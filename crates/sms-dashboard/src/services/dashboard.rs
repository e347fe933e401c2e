//! Dashboard totals.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::db::queries::{campaign, contact, message};
use crate::db::DbPool;
use crate::error::AppResult;

/// Aggregate numbers shown on the dashboard.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub contacts: i64,
    pub opted_out: i64,
    pub campaigns: i64,
    /// Message count keyed by status
    pub messages: BTreeMap<String, i64>,
}

/// Compute dashboard totals.
pub async fn dashboard_stats(pool: &DbPool) -> AppResult<DashboardStats> {
    let messages = message::count_by_status(pool, None)
        .await?
        .into_iter()
        .map(|c| (c.status, c.n))
        .collect();

    Ok(DashboardStats {
        contacts: contact::count_all(pool).await?,
        opted_out: contact::count_opted_out(pool).await?,
        campaigns: campaign::count_all(pool).await?,
        messages,
    })
}
