//! Telegram Bot API adapter.
//!
//! Long-polls `getUpdates` for messages and callback queries and delivers
//! replies with `sendMessage`, trying Markdown first and falling back to
//! plain text when Telegram rejects the formatting. The transport is an
//! external collaborator; everything here is plumbing behind the
//! [`ChatSender`] port.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::time::Duration;

use crate::domain::foundation::UserId;
use crate::ports::{Button, ChatError, ChatSender, OutgoingMessage};

/// One update pulled from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatUpdate {
    /// A text message from a user.
    Message {
        user: UserId,
        display_name: Option<String>,
        handle: Option<String>,
        text: String,
    },
    /// An inline-keyboard callback press.
    Callback {
        user: UserId,
        callback_id: String,
        data: String,
    },
}

/// Result of one polling round.
#[derive(Debug, Clone)]
pub struct UpdateBatch {
    /// Offset to pass to the next poll.
    pub next_offset: i64,
    pub updates: Vec<ChatUpdate>,
}

/// Telegram Bot API client.
pub struct TelegramClient {
    bot_token: SecretString,
    api_base_url: String,
    client: reqwest::Client,
}

impl TelegramClient {
    pub fn new(bot_token: SecretString) -> Self {
        Self {
            bot_token,
            api_base_url: "https://api.telegram.org".to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Overrides the API base URL (for testing against a stub server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.api_base_url,
            self.bot_token.expose_secret()
        )
    }

    /// One long-polling round against `getUpdates`.
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<UpdateBatch, ChatError> {
        let body = serde_json::json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message", "callback_query"]
        });

        let response = self
            .client
            .post(self.api_url("getUpdates"))
            // The request must outlive the server-side long-poll window.
            .timeout(Duration::from_secs(timeout_secs + 10))
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::ReceiveFailed(e.to_string()))?;

        let data: Value = response
            .json()
            .await
            .map_err(|e| ChatError::ReceiveFailed(e.to_string()))?;

        Ok(collect_updates(&data, offset))
    }

    /// Acknowledges a callback press so the client stops its spinner.
    pub async fn answer_callback(&self, callback_id: &str) -> Result<(), ChatError> {
        let body = serde_json::json!({ "callback_query_id": callback_id });
        self.client
            .post(self.api_url("answerCallbackQuery"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::SendFailed(e.to_string()))?;
        Ok(())
    }

    async fn send_once(
        &self,
        chat: UserId,
        message: &OutgoingMessage,
        markdown: bool,
    ) -> Result<reqwest::Response, ChatError> {
        let mut body = serde_json::json!({
            "chat_id": chat.as_i64(),
            "text": message.text,
        });
        if markdown {
            body["parse_mode"] = Value::from("Markdown");
        }
        if !message.buttons.is_empty() {
            body["reply_markup"] = inline_keyboard(&message.buttons);
        }

        self.client
            .post(self.api_url("sendMessage"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::SendFailed(e.to_string()))
    }
}

#[async_trait]
impl ChatSender for TelegramClient {
    /// Sends Markdown-first, retrying without `parse_mode` when Telegram
    /// rejects the formatting.
    async fn send(&self, chat: UserId, message: OutgoingMessage) -> Result<(), ChatError> {
        let markdown_resp = self.send_once(chat, &message, true).await?;
        if markdown_resp.status().is_success() {
            return Ok(());
        }

        tracing::warn!(
            status = %markdown_resp.status(),
            "sendMessage with Markdown failed; retrying without parse_mode"
        );

        let plain_resp = self.send_once(chat, &message, false).await?;
        if plain_resp.status().is_success() {
            return Ok(());
        }

        Err(ChatError::SendFailed(format!(
            "sendMessage failed with status {}",
            plain_resp.status()
        )))
    }
}

/// Builds the `reply_markup` object, one button per keyboard row.
fn inline_keyboard(buttons: &[Button]) -> Value {
    let rows: Vec<Value> = buttons
        .iter()
        .map(|button| match button {
            Button::Url { label, url } => {
                serde_json::json!([{ "text": label, "url": url }])
            }
            Button::Callback { label, data } => {
                serde_json::json!([{ "text": label, "callback_data": data }])
            }
        })
        .collect();
    serde_json::json!({ "inline_keyboard": rows })
}

/// Extracts supported updates from a `getUpdates` response body.
fn collect_updates(data: &Value, offset: i64) -> UpdateBatch {
    let mut next_offset = offset;
    let mut updates = Vec::new();

    let Some(results) = data.get("result").and_then(Value::as_array) else {
        return UpdateBatch {
            next_offset,
            updates,
        };
    };

    for update in results {
        if let Some(update_id) = update.get("update_id").and_then(Value::as_i64) {
            next_offset = next_offset.max(update_id + 1);
        }

        if let Some(message) = update.get("message") {
            let Some(from_id) = message
                .get("from")
                .and_then(|f| f.get("id"))
                .and_then(Value::as_i64)
            else {
                continue;
            };
            let Some(text) = message.get("text").and_then(Value::as_str) else {
                // Stickers, photos and the like are not consumed.
                continue;
            };
            updates.push(ChatUpdate::Message {
                user: UserId::new(from_id),
                display_name: message
                    .get("from")
                    .and_then(|f| f.get("first_name"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
                handle: message
                    .get("from")
                    .and_then(|f| f.get("username"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
                text: text.to_string(),
            });
        } else if let Some(callback) = update.get("callback_query") {
            let (Some(from_id), Some(callback_id), Some(data)) = (
                callback
                    .get("from")
                    .and_then(|f| f.get("id"))
                    .and_then(Value::as_i64),
                callback.get("id").and_then(Value::as_str),
                callback.get("data").and_then(Value::as_str),
            ) else {
                continue;
            };
            updates.push(ChatUpdate::Callback {
                user: UserId::new(from_id),
                callback_id: callback_id.to_string(),
                data: data.to_string(),
            });
        }
    }

    UpdateBatch {
        next_offset,
        updates,
    }
}
