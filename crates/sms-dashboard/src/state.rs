//! Application state for the SMS Dashboard server.
//!
//! This module defines the shared application state that is
//! passed to all handlers via Axum's state management.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::services::{CampaignService, ContactService};
use crate::template::Views;

/// Shared application state.
///
/// Cloned into every handler; all fields are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DbPool,

    /// Application configuration
    pub config: Arc<AppConfig>,

    /// Compiled HTML views
    pub views: Arc<Views>,

    pub contacts: ContactService,

    pub campaigns: CampaignService,

    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: DbPool, config: AppConfig, views: Views) -> Self {
        Self {
            contacts: ContactService::new(db.clone()),
            campaigns: CampaignService::new(db.clone(), config.public_base_url.clone()),
            db,
            config: Arc::new(config),
            views: Arc::new(views),
            start_time: std::time::Instant::now(),
        }
    }

    /// Get the server uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
