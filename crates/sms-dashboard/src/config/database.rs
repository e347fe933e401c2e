//! Database configuration for the SQLite store.

use serde::Deserialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use std::time::Duration;

/// Database configuration loaded from environment variables.
///
/// Environment variables are prefixed with `DB_`:
/// - `DB_PATH`: SQLite file path (default: "sms.db")
/// - `DB_MAX_CONNECTIONS`: Pool size (default: 5)
/// - `DB_ACQUIRE_TIMEOUT`: Connection acquire timeout in seconds (default: 30)
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file
    #[serde(default = "default_path")]
    pub path: String,

    /// Maximum connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection acquire timeout in seconds
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout: u64,
}

fn default_path() -> String {
    "sms.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    30
}

impl DatabaseConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are prefixed with `DB_`.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("DB_").from_env::<DatabaseConfig>()
    }

    /// Get SQLite connection options.
    pub fn connect_options(&self) -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            max_connections: default_max_connections(),
            acquire_timeout: default_acquire_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DatabaseConfig::default();
        assert_eq!(config.path, "sms.db");
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn test_prefixed_path() {
        let vars = vec![("DB_PATH".to_string(), "/var/lib/sms/sms.db".to_string())];
        let config = envy::prefixed("DB_")
            .from_iter::<_, DatabaseConfig>(vars)
            .unwrap();
        assert_eq!(config.path, "/var/lib/sms/sms.db");
        assert_eq!(config.acquire_timeout, 30);
    }
}
