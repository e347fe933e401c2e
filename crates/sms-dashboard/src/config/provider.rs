//! Africa's Talking provider configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Production API host.
pub const LIVE_ENDPOINT: &str = "https://api.africastalking.com";

/// Sandbox API host, selected when the username is `sandbox`.
pub const SANDBOX_ENDPOINT: &str = "https://api.sandbox.africastalking.com";

/// Provider configuration loaded from environment variables.
///
/// Environment variables are prefixed with `AT_`:
/// - `AT_USERNAME`: Account username (default: "sandbox")
/// - `AT_API_KEY`: API key; sending is disabled when empty
/// - `AT_SENDER_ID`: Optional sender id / short code
/// - `AT_BASE_URL`: Override for the API host
/// - `AT_CA_BUNDLE`: PEM bundle trusted in addition to the built-in roots
/// - `AT_SSL_VERIFY`: `false`, `0`, `no` or `off` disables certificate verification
/// - `AT_TIMEOUT_SECS`: Request timeout (default: 30)
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub sender_id: Option<String>,

    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub ca_bundle: Option<PathBuf>,

    /// Raw `AT_SSL_VERIFY` value, interpreted by [`ProviderConfig::ssl_verify_enabled`].
    #[serde(default)]
    pub ssl_verify: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_username() -> String {
    "sandbox".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl ProviderConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are prefixed with `AT_`.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("AT_").from_env::<ProviderConfig>()
    }

    /// Whether an API key was supplied.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Whether TLS peer verification stays on.
    ///
    /// Only an explicit false-equivalent turns it off; unset or unrecognized
    /// values keep verification enabled.
    pub fn ssl_verify_enabled(&self) -> bool {
        match self.ssl_verify.as_deref() {
            Some(raw) => !matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "false" | "0" | "no" | "off"
            ),
            None => true,
        }
    }

    /// Sender id, with blank values treated as absent.
    pub fn sender_id(&self) -> Option<&str> {
        self.sender_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// CA bundle path, with blank values treated as absent.
    pub fn ca_bundle(&self) -> Option<&Path> {
        let path = self.ca_bundle.as_deref()?;
        match path.to_str().map(str::trim) {
            Some("") => None,
            Some(trimmed) => Some(Path::new(trimmed)),
            None => Some(path),
        }
    }

    /// API host without a trailing slash.
    pub fn endpoint(&self) -> String {
        match self.base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ if self.username == "sandbox" => SANDBOX_ENDPOINT.to_string(),
            _ => LIVE_ENDPOINT.to_string(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            api_key: String::new(),
            sender_id: None,
            base_url: None,
            ca_bundle: None,
            ssl_verify: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}
