//! SMS Dashboard Library
//!
//! A small admin service for consent-aware SMS campaigns:
//!
//! - **Contacts**: manual entry and CSV import, with consent and opt-out tracking
//! - **Campaigns**: templated messages fanned out to tagged contacts
//! - **Dispatcher**: background sender with per-second throughput and a daily cap
//! - **Unsubscribe**: public opt-out link appended to every message
//!
//! ## Architecture
//!
//! State lives in SQLite. Starting a campaign writes one `queued` row per
//! recipient; the [`dispatcher`] drains that queue through an
//! [`sms::SmsProvider`], by default the Africa's Talking HTTPS API. The
//! outbound TLS client honours `AT_CA_BUNDLE` and `AT_SSL_VERIFY`.
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from environment variables
//! - [`db`]: Database connectivity, schema, models and queries
//! - [`dispatcher`]: Background queue processing
//! - [`error`]: Custom error types with Axum integration
//! - [`handlers`]: HTTP route handlers
//! - [`sms`]: SMS providers
//! - [`state`]: Shared application state
//!
//! ## Example
//!
//! ```ignore
//! use sms_dashboard::{
//!     config::{AppConfig, DatabaseConfig},
//!     db::{create_pool, init_schema},
//!     routes::build_router,
//!     state::AppState,
//!     template::Views,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let app_config = AppConfig::from_env()?;
//!     let db_pool = create_pool(&DatabaseConfig::from_env()?).await?;
//!     init_schema(&db_pool).await?;
//!     let app = build_router(AppState::new(db_pool, app_config, Views::new()?));
//!     // ... bind and serve
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod db;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod result_ext;
pub mod routes;
pub mod services;
pub mod sms;
pub mod state;
pub mod template;

pub use error::{AppError, AppResult};
pub use result_ext::ResultExt;
