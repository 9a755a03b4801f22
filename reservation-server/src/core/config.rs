//! Server configuration

use std::path::Path;
use std::time::Duration;

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// SMTP relay settings, present only when `SMTP_HOST` is set
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | ./data | Working directory |
/// | DATABASE_PATH | $WORK_DIR/reservation.db | SQLite database file |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | Runtime environment |
/// | LOG_LEVEL | info | Log level (`RUST_LOG` takes precedence) |
/// | LOG_DIR | - | Daily log files, when the directory exists |
/// | MAIL_FROM | noreply@reservation.local | Sender address |
/// | SMTP_HOST / SMTP_PORT | - / 587 | SMTP relay; logs mail instead when unset |
/// | SMTP_USERNAME / SMTP_PASSWORD | - | SMTP credentials |
/// | MAIL_QUEUE_CAPACITY | 256 | Pending mails before new ones are dropped |
/// | BOOKING_EXPIRY_INTERVAL_SECS | 300 | Expiry sweep interval |
/// | REQUEST_TIMEOUT_MS | 30000 | Request timeout (milliseconds) |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/srv/reservation HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database and logs
    pub work_dir: String,
    pub database_path: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub mail_from: String,
    pub smtp: Option<SmtpSettings>,
    pub mail_queue_capacity: usize,
    pub booking_expiry_interval_secs: u64,
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let database_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| {
            Path::new(&work_dir)
                .join("reservation.db")
                .to_string_lossy()
                .into_owned()
        });

        let smtp = env_opt("SMTP_HOST").map(|host| SmtpSettings {
            host,
            port: env_parse("SMTP_PORT", 587),
            username: env_opt("SMTP_USERNAME"),
            password: env_opt("SMTP_PASSWORD"),
        });

        Self {
            work_dir,
            database_path,
            http_port: env_parse("HTTP_PORT", 3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: env_opt("LOG_DIR"),
            mail_from: std::env::var("MAIL_FROM").unwrap_or_else(|_| "noreply@reservation.local".into()),
            smtp,
            mail_queue_capacity: env_parse("MAIL_QUEUE_CAPACITY", 256),
            booking_expiry_interval_secs: env_parse("BOOKING_EXPIRY_INTERVAL_SECS", 300),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS", 30000),
        }
    }

    /// Override the working directory and port, keeping the rest from the environment.
    ///
    /// Commonly used in tests.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.database_path = Path::new(&config.work_dir)
            .join("reservation.db")
            .to_string_lossy()
            .into_owned();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn booking_expiry_interval(&self) -> Duration {
        // A zero interval would spin
        Duration::from_secs(self.booking_expiry_interval_secs.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
