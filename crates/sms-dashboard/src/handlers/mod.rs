//! HTTP handlers for the SMS Dashboard.
//!
//! This module contains all route handlers organized by domain.

pub mod api;
pub mod auth;
pub mod campaigns;
pub mod contacts;
pub mod dashboard;
pub mod health;
pub mod unsubscribe;

pub use auth::AdminToken;
pub use health::{api_health, health_check};
