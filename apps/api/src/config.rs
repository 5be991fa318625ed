//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//! A `.env` file in the working directory is read first (see `main`).

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// SMTP settings, required only when notifications are enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,

    /// Sender mailbox, e.g. `Shelf <no-reply@shelf.example>`
    pub from: String,
}

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP server port
    pub http_port: u16,

    /// Interface to bind
    pub bind_addr: String,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,

    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// JWT lifetime in seconds
    pub jwt_lifetime_secs: i64,

    /// Send welcome / order confirmation emails
    pub email_notifications: bool,

    /// Present when `email_notifications` is on
    pub smtp: Option<SmtpConfig>,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let email_notifications = parse_bool(&get("EMAIL_NOTIFICATIONS", "false"));

        let smtp = if email_notifications {
            let required = |key: &str| {
                lookup(key)
                    .filter(|v| !v.trim().is_empty())
                    .ok_or_else(|| ConfigError::MissingRequired(key.to_string()))
            };

            Some(SmtpConfig {
                host: required("SMTP_HOST")?,
                port: get("SMTP_PORT", "587")
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("SMTP_PORT".to_string()))?,
                username: required("SMTP_USERNAME")?,
                password: required("SMTP_PASSWORD")?,
                from: required("SMTP_FROM")?,
            })
        } else {
            None
        };

        let config = ApiConfig {
            http_port: get("HTTP_PORT", "8080")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,

            bind_addr: get("BIND_ADDR", "0.0.0.0"),

            database_path: PathBuf::from(get("DATABASE_PATH", "./data/shelf.db")),

            db_max_connections: get("DB_MAX_CONNECTIONS", "5")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?,

            // In production, this MUST be set via environment variable
            jwt_secret: get("JWT_SECRET", "shelf-dev-secret-change-in-production"),

            jwt_lifetime_secs: get("JWT_LIFETIME_SECS", "86400") // 24 hours
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JWT_LIFETIME_SECS".to_string()))?,

            email_notifications,
            smtp,
        };

        if config.jwt_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue("JWT_LIFETIME_SECS".to_string()));
        }

        Ok(config)
    }

    /// `bind_addr:http_port`
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.http_port)
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.http_port, 8080);
        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
        assert_eq!(config.database_path, PathBuf::from("./data/shelf.db"));
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.jwt_lifetime_secs, 86400);
        assert!(!config.email_notifications);
        assert!(config.smtp.is_none());
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("HTTP_PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref k) if k == "HTTP_PORT"));
    }

    #[test]
    fn test_non_positive_lifetime() {
        assert!(load(&[("JWT_LIFETIME_SECS", "0")]).is_err());
    }

    #[test]
    fn test_notifications_require_smtp() {
        let err = load(&[("EMAIL_NOTIFICATIONS", "true"), ("SMTP_HOST", "smtp.example.com")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired(ref k) if k == "SMTP_USERNAME"));
    }

    #[test]
    fn test_notifications_with_smtp() {
        let config = load(&[
            ("EMAIL_NOTIFICATIONS", "1"),
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "2525"),
            ("SMTP_USERNAME", "shelf"),
            ("SMTP_PASSWORD", "secret"),
            ("SMTP_FROM", "Shelf <no-reply@example.com>"),
        ])
        .unwrap();

        let smtp = config.smtp.unwrap();
        assert!(config.email_notifications);
        assert_eq!(smtp.port, 2525);
        assert_eq!(smtp.host, "smtp.example.com");
    }
}
