//! Service layer for the SMS Dashboard.
//!
//! Services encapsulate business logic and coordinate
//! between handlers and database queries.

pub mod campaign;
pub mod contact;
pub mod dashboard;

pub use campaign::{CampaignService, CampaignStats};
pub use contact::{ContactService, ImportSummary};
pub use dashboard::{dashboard_stats, DashboardStats};
