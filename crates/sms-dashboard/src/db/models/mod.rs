//! Database models for the SMS Dashboard.

pub mod audit;
pub mod campaign;
pub mod contact;
pub mod message;

pub use audit::AuditEntry;
pub use campaign::Campaign;
pub use contact::Contact;
pub use message::{Message, MessageStatus, QueuedMessage, StatusCount};
