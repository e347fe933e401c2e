//! SMS provider errors.

use thiserror::Error;

/// Errors raised while delivering a message.
#[derive(Debug, Error)]
pub enum SmsError {
    /// No API key configured.
    #[error("Africa's Talking not configured. Set AT_API_KEY in .env")]
    NotConfigured,

    /// CA bundle could not be loaded.
    #[error("TLS configuration error: {0}")]
    Tls(String),

    /// Connection, TLS handshake or timeout failure.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API returned a non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The API accepted the request but rejected the recipient.
    #[error("AT send failed: {status} ({code})")]
    Rejected { status: String, code: String },

    /// The response body could not be understood.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}
