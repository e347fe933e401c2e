//! Configuration module for the SMS Dashboard server.
//!
//! This module provides configuration loading from environment variables
//! using the `envy` crate for type-safe environment variable parsing.

mod app;
mod database;
mod provider;

pub use app::AppConfig;
pub use database::DatabaseConfig;
pub use provider::ProviderConfig;
