//! Chat sender port.
//!
//! The chat transport itself is an external collaborator; this port is
//! the narrow "send message" surface the application writes replies to.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::UserId;

/// Inline button attached to an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Button {
    /// Opens an external URL (checkout link).
    Url { label: String, url: String },
    /// Sends a callback payload back to the bot.
    Callback { label: String, data: String },
}

/// Formatted reply to one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Message body, Markdown-formatted.
    pub text: String,

    /// Optional inline keyboard, one button per row.
    pub buttons: Vec<Button>,
}

impl OutgoingMessage {
    /// Plain text reply without buttons.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    /// Appends a URL button row.
    pub fn with_url_button(mut self, label: impl Into<String>, url: impl Into<String>) -> Self {
        self.buttons.push(Button::Url {
            label: label.into(),
            url: url.into(),
        });
        self
    }

    /// Appends a callback button row.
    pub fn with_callback_button(
        mut self,
        label: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        self.buttons.push(Button::Callback {
            label: label.into(),
            data: data.into(),
        });
        self
    }
}

/// Errors from the chat transport.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Delivery failed; never fatal to the process.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Polling the transport for updates failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}

/// Port for delivering replies to users.
#[async_trait]
pub trait ChatSender: Send + Sync {
    /// Sends one message to one user's chat.
    async fn send(&self, chat: UserId, message: OutgoingMessage) -> Result<(), ChatError>;
}
