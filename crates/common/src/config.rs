use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Default homework status endpoint.
pub const DEFAULT_PRAKTIKUM_API_URL: &str =
    "https://praktikum.yandex.ru/api/user_api/homework_statuses/";

/// Default Telegram Bot API base URL.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Seconds between polling cycles.
pub const TIME_TO_SLEEP: u64 = 300;

/// Seconds between delivery attempts.
pub const EXCEPTION_TIME_TO_SLEEP: u64 = 30;

/// Default transport timeout for both HTTP clients.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Size at which the log file is rotated.
pub const DEFAULT_LOG_MAX_BYTES: u64 = 100_000;

/// Rotated log files kept next to the active one.
pub const DEFAULT_LOG_BACKUP_COUNT: usize = 5;

/// Console output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// OAuth token for the homework status API
    pub praktikum_token: String,

    /// Telegram bot token
    pub telegram_token: String,

    /// Chat that receives every notification
    pub telegram_chat_id: String,

    /// Homework status endpoint
    pub praktikum_api_url: String,

    /// Telegram Bot API base URL
    pub telegram_api_url: String,

    /// Sleep between polling cycles in seconds (default: 300)
    pub poll_interval_secs: u64,

    /// Delay between delivery attempts in seconds (default: 30)
    pub retry_interval_secs: u64,

    /// Delivery attempt ceiling; `None` retries until delivery succeeds
    pub delivery_max_attempts: Option<u32>,

    /// Request timeout applied to every HTTP call in seconds (default: 30)
    pub http_timeout_secs: u64,

    /// Optional second log destination
    pub log_file: Option<String>,

    /// Rotate `log_file` once it reaches this many bytes (default: 100000)
    pub log_max_bytes: u64,

    /// Rotated copies of `log_file` to keep (default: 5)
    pub log_backup_count: usize,

    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from environment variables, honoring a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "LOG_FORMAT",
                    reason: format!("expected `text` or `json`, got `{other}`"),
                });
            }
        };

        let delivery_max_attempts = match lookup("DELIVERY_MAX_ATTEMPTS") {
            Some(raw) => {
                let attempts: u32 = parse_number("DELIVERY_MAX_ATTEMPTS", &raw)?;
                if attempts == 0 {
                    return Err(ConfigError::Invalid {
                        var: "DELIVERY_MAX_ATTEMPTS",
                        reason: "must be at least 1".to_string(),
                    });
                }
                Some(attempts)
            }
            None => None,
        };

        let log_max_bytes = lookup("LOG_MAX_BYTES")
            .map(|raw| parse_number("LOG_MAX_BYTES", &raw))
            .transpose()?
            .unwrap_or(DEFAULT_LOG_MAX_BYTES);
        if log_max_bytes == 0 {
            return Err(ConfigError::Invalid {
                var: "LOG_MAX_BYTES",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            praktikum_token: required("PRAKTIKUM_TOKEN")?,
            telegram_token: required("TELEGRAM_TOKEN")?,
            telegram_chat_id: required("TELEGRAM_CHAT_ID")?,
            praktikum_api_url: lookup("PRAKTIKUM_API_URL")
                .unwrap_or_else(|| DEFAULT_PRAKTIKUM_API_URL.to_string()),
            telegram_api_url: lookup("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            poll_interval_secs: lookup("POLL_INTERVAL_SECS")
                .map(|raw| parse_number("POLL_INTERVAL_SECS", &raw))
                .transpose()?
                .unwrap_or(TIME_TO_SLEEP),
            retry_interval_secs: lookup("RETRY_INTERVAL_SECS")
                .map(|raw| parse_number("RETRY_INTERVAL_SECS", &raw))
                .transpose()?
                .unwrap_or(EXCEPTION_TIME_TO_SLEEP),
            delivery_max_attempts,
            http_timeout_secs: lookup("HTTP_TIMEOUT_SECS")
                .map(|raw| parse_number("HTTP_TIMEOUT_SECS", &raw))
                .transpose()?
                .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            log_file: lookup("LOG_FILE").filter(|v| !v.trim().is_empty()),
            log_max_bytes,
            log_backup_count: lookup("LOG_BACKUP_COUNT")
                .map(|raw| parse_number("LOG_BACKUP_COUNT", &raw))
                .transpose()?
                .unwrap_or(DEFAULT_LOG_BACKUP_COUNT),
            log_format,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn parse_number<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })
}
