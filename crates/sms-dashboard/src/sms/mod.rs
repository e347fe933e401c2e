//! Outbound SMS delivery.
//!
//! The dispatcher talks to an [`SmsProvider`]. In production that is the
//! Africa's Talking HTTPS API; when no API key is configured every send
//! fails fast so the dashboard itself stays usable.

mod africastalking;
mod error;
mod tls;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::ProviderConfig;

pub use africastalking::AfricasTalkingClient;
pub use error::SmsError;
pub use tls::build_http_client;

/// A channel able to deliver one SMS.
#[async_trait]
pub trait SmsProvider: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &'static str;

    /// Send `body` to `to` and return the provider's message id.
    async fn send(&self, to: &str, body: &str) -> Result<String, SmsError>;
}

/// Provider used when `AT_API_KEY` is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredProvider;

#[async_trait]
impl SmsProvider for UnconfiguredProvider {
    fn name(&self) -> &'static str {
        "unconfigured"
    }

    async fn send(&self, _to: &str, _body: &str) -> Result<String, SmsError> {
        Err(SmsError::NotConfigured)
    }
}

/// Pick the provider for this configuration.
///
/// The HTTPS client is built here, once, so a bad `AT_CA_BUNDLE` surfaces at
/// startup rather than on the first send.
pub fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn SmsProvider>, SmsError> {
    if !config.is_configured() {
        tracing::warn!("AT_API_KEY not set, messages will fail until it is configured");
        return Ok(Arc::new(UnconfiguredProvider));
    }

    let client = AfricasTalkingClient::from_config(config)?;
    tracing::info!(
        username = %config.username,
        endpoint = %config.endpoint(),
        sender_id = config.sender_id().unwrap_or("-"),
        "Africa's Talking provider ready"
    );
    Ok(Arc::new(client))
}
