//! Application configuration for the SMS Dashboard server.

use serde::{Deserialize, Deserializer};

/// Bounds applied to `SEND_PER_SECOND`.
const SEND_PER_SECOND_RANGE: (u32, u32) = (1, 30);

/// Bounds applied to `MAX_DAILY_PER_CONTACT`.
const MAX_DAILY_RANGE: (u32, u32) = (1, 20);

/// Token shipped as the default; the server warns when it is still in use.
pub const DEFAULT_ADMIN_TOKEN: &str = "change_me_now";

/// Application configuration loaded from environment variables.
///
/// Variables are read without a prefix:
/// - `APP_NAME`: Title shown on every page (default: "SMS Dashboard")
/// - `ADMIN_TOKEN`: Shared admin token (default: "change_me_now")
/// - `PUBLIC_BASE_URL`: Externally reachable base URL used for opt-out links
/// - `HOST` / `PORT`: Bind address (default: 127.0.0.1:8000)
/// - `SEND_PER_SECOND`: Dispatcher throughput, clamped to 1..=30 (default: 2)
/// - `MAX_DAILY_PER_CONTACT`: Daily cap per contact, clamped to 1..=20 (default: 3)
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Display name
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Admin token required by every dashboard route
    #[serde(default = "default_admin_token")]
    pub admin_token: String,

    /// Base URL used to build public opt-out links
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// Server bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Messages dispatched per one-second tick
    #[serde(default = "default_send_per_second", deserialize_with = "saturating_u32")]
    pub send_per_second: u32,

    /// Messages a single contact may receive per day
    #[serde(
        default = "default_max_daily_per_contact",
        deserialize_with = "saturating_u32"
    )]
    pub max_daily_per_contact: u32,
}

fn default_app_name() -> String {
    "SMS Dashboard".to_string()
}

fn default_admin_token() -> String {
    DEFAULT_ADMIN_TOKEN.to_string()
}

fn default_public_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_send_per_second() -> u32 {
    2
}

fn default_max_daily_per_contact() -> u32 {
    3
}

/// Accept any integer; negatives become 0 and are raised by [`AppConfig::normalized`].
fn saturating_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = i64::deserialize(deserializer)?;
    Ok(value.clamp(0, i64::from(u32::MAX)) as u32)
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// The result is already normalized, see [`AppConfig::normalized`].
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env::<AppConfig>().map(AppConfig::normalized)
    }

    /// Clamp the throughput settings and strip the trailing `/` from the base URL.
    pub fn normalized(mut self) -> Self {
        self.send_per_second = self
            .send_per_second
            .clamp(SEND_PER_SECOND_RANGE.0, SEND_PER_SECOND_RANGE.1);
        self.max_daily_per_contact = self
            .max_daily_per_contact
            .clamp(MAX_DAILY_RANGE.0, MAX_DAILY_RANGE.1);
        self.public_base_url = self.public_base_url.trim_end_matches('/').to_string();
        self
    }

    /// Get the server bind address as a string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether the admin token is still the shipped default.
    pub fn uses_default_token(&self) -> bool {
        self.admin_token == DEFAULT_ADMIN_TOKEN
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            admin_token: default_admin_token(),
            public_base_url: default_public_base_url(),
            host: default_host(),
            port: default_port(),
            send_per_second: default_send_per_second(),
            max_daily_per_contact: default_max_daily_per_contact(),
        }
    }
}
