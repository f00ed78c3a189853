//! Server configuration
//!
//! All settings are loaded from environment variables with sensible
//! development defaults.

use std::path::PathBuf;

use crate::auth::JwtConfig;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Purpose |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | Working directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | ADMIN_EMAIL | admin@example.com | Seeded superuser email |
/// | ADMIN_PASSWORD | password123 | Seeded superuser password |
/// | SMTP_HOST | (unset) | SMTP relay; mail disabled when missing |
/// | SMTP_PORT | 587 | SMTP submission port |
/// | SMTP_USERNAME / SMTP_PASSWORD | (unset) | SMTP credentials |
/// | MAIL_FROM | admin@example.com | Sender address for outgoing mail |
/// | CONTACT_RECIPIENT | admin@example.com | Contact form recipient |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Running environment: development | staging | production
    pub environment: String,
    /// Seeded superuser email
    pub admin_email: String,
    /// Seeded superuser password
    pub admin_password: String,
    /// Outgoing mail configuration
    pub mail: MailConfig,
}

/// SMTP transport configuration for the contact form mailer
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// SMTP relay host; mail sending is disabled when unset
    pub smtp_host: Option<String>,
    /// SMTP submission port
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    /// Sender address for outgoing mail
    pub from_address: String,
    /// Where contact form submissions are delivered
    pub contact_recipient: String,
}

impl MailConfig {
    pub fn from_env() -> Self {
        Self {
            smtp_host: std::env::var("SMTP_HOST").ok().filter(|h| !h.is_empty()),
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(587),
            smtp_username: std::env::var("SMTP_USERNAME").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
            from_address: std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "admin@example.com".into()),
            contact_recipient: std::env::var("CONTACT_RECIPIENT")
                .unwrap_or_else(|_| "admin@example.com".into()),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to development defaults.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            admin_email: std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@example.com".into()),
            admin_password: std::env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| "password123".into()),
            mail: MailConfig::from_env(),
        }
    }

    /// Override work dir and port, keeping the rest from the environment
    ///
    /// Used by tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// Directory holding the SQLite database
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// Full path of the SQLite database file
    pub fn database_path(&self) -> PathBuf {
        self.database_dir().join("admin.db")
    }

    /// Create the working directory structure if missing
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
