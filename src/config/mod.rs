//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `COACH_SOMMEIL` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use coach_sommeil::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Webhook server on {}", config.server.socket_addr());
//! ```

mod database;
mod error;
mod payment;
mod server;
mod telegram;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::ServerConfig;
pub use telegram::TelegramConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Webhook server configuration (host, port, log filter)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Payment configuration (Stripe)
    pub payment: PaymentConfig,

    /// Telegram transport configuration
    pub telegram: TelegramConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variable Format
    ///
    /// - `COACH_SOMMEIL__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `COACH_SOMMEIL__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("COACH_SOMMEIL")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.payment.validate()?;
        self.telegram.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("COACH_SOMMEIL__DATABASE__URL", "postgresql://test@localhost/coach");
        env::set_var("COACH_SOMMEIL__PAYMENT__STRIPE_API_KEY", "sk_test_xxx");
        env::set_var("COACH_SOMMEIL__PAYMENT__STRIPE_WEBHOOK_SECRET", "whsec_xxx");
        env::set_var("COACH_SOMMEIL__PAYMENT__STRIPE_PRICE_ID", "price_xxx");
        env::set_var("COACH_SOMMEIL__TELEGRAM__BOT_TOKEN", "123:abc");
        env::set_var("COACH_SOMMEIL__TELEGRAM__BOT_USERNAME", "CoachSommeilBot");
    }

    fn clear_env() {
        env::remove_var("COACH_SOMMEIL__DATABASE__URL");
        env::remove_var("COACH_SOMMEIL__PAYMENT__STRIPE_API_KEY");
        env::remove_var("COACH_SOMMEIL__PAYMENT__STRIPE_WEBHOOK_SECRET");
        env::remove_var("COACH_SOMMEIL__PAYMENT__STRIPE_PRICE_ID");
        env::remove_var("COACH_SOMMEIL__TELEGRAM__BOT_TOKEN");
        env::remove_var("COACH_SOMMEIL__TELEGRAM__BOT_USERNAME");
        env::remove_var("COACH_SOMMEIL__SERVER__PORT");
    }

    #[test]
    fn loads_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(config.database.url, "postgresql://test@localhost/coach");
        assert_eq!(config.telegram.bot_username, "CoachSommeilBot");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn server_defaults_apply() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn custom_port_overrides_default() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("COACH_SOMMEIL__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        assert_eq!(result.unwrap().server.port, 3000);
    }
}
