//! Database queries for the SMS Dashboard.
//!
//! Functions take any SQLite executor so they run against the pool or
//! inside a transaction.

pub mod audit;
pub mod campaign;
pub mod contact;
pub mod message;
