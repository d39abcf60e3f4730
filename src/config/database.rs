//! Database configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum connections allowed
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection acquire timeout in seconds. Bounds every store call:
    /// a saturated or unreachable database surfaces as an error instead
    /// of a hang.
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    /// Idle connection timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Get acquire timeout as Duration
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Get idle timeout as Duration
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Validate database configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("DATABASE__URL"));
        }
        if !self.url.starts_with("postgres://") && !self.url.starts_with("postgresql://") {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if self.max_connections > 100 {
            return Err(ValidationError::PoolSizeTooLarge);
        }
        Ok(())
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    600
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_string(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            idle_timeout_secs: default_idle_timeout(),
        }
    }

    #[test]
    fn postgres_urls_validate() {
        assert!(config("postgres://localhost/coach").validate().is_ok());
        assert!(config("postgresql://localhost/coach").validate().is_ok());
    }

    #[test]
    fn non_postgres_url_is_rejected() {
        assert!(config("mysql://localhost/coach").validate().is_err());
        assert!(config("").validate().is_err());
    }

    #[test]
    fn oversized_pool_is_rejected() {
        let mut cfg = config("postgres://localhost/coach");
        cfg.max_connections = 500;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn timeouts_convert_to_durations() {
        let cfg = config("postgres://localhost/coach");
        assert_eq!(cfg.acquire_timeout(), Duration::from_secs(10));
        assert_eq!(cfg.idle_timeout(), Duration::from_secs(600));
    }
}
