//! Database module for the SMS Dashboard server.
//!
//! This module provides database connectivity, models, and queries
//! for SQLite using SQLx.

pub mod models;
pub mod pool;
pub mod queries;
pub mod schema;

pub use pool::{create_memory_pool, create_pool, DbPool};
pub use schema::init_schema;
