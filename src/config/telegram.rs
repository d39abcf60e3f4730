//! Telegram transport configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Telegram bot configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token
    pub bot_token: String,

    /// Bot username, used to build t.me deep links for checkout
    /// success/cancel redirects
    pub bot_username: String,

    /// Long-polling timeout in seconds
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
}

impl TelegramConfig {
    /// Deep link back into the bot chat with a `/start` argument.
    pub fn deep_link(&self, start_arg: &str) -> String {
        format!("https://t.me/{}?start={start_arg}", self.bot_username)
    }

    /// Validate telegram configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bot_token.is_empty() {
            return Err(ValidationError::MissingRequired("TELEGRAM__BOT_TOKEN"));
        }
        if self.bot_username.is_empty() {
            return Err(ValidationError::MissingRequired("TELEGRAM__BOT_USERNAME"));
        }
        Ok(())
    }
}

fn default_poll_timeout() -> u64 {
    30
}
