//! Command router: dispatches inbound chat traffic to the entitlement
//! engine, the diagnostic registry, or the static content tables.
//!
//! Commands always win over session input; free text feeds the user's
//! active diagnostic session when one exists and falls back to a help
//! hint otherwise. Storage failures are absorbed here: the user gets a
//! retry message, never a crash.

use std::sync::Arc;

use chrono::Datelike;

use crate::domain::diagnostic::{assess, SessionRegistry, StepOutcome};
use crate::domain::entitlement::EntitlementEngine;
use crate::domain::foundation::UserId;
use crate::ports::{CheckoutProvider, CheckoutRequest, OutgoingMessage, UserStore};

use super::{content, replies};

/// Callback payload of the demo-activation inline button.
pub const DEMO_CALLBACK: &str = "activate_premium_demo";

/// Parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start { deep_link: Option<String> },
    Help,
    Diagnostic,
    Cancel,
    Naps { age: Option<u32> },
    Bedtime,
    NightWaking { time: Option<String> },
    Crisis,
    Regression,
    Routine { age: Option<u32> },
    Tip,
    Premium,
    Status,
    Unknown,
}

impl Command {
    /// Parses a text message into a command.
    ///
    /// Returns `None` for free text (no leading slash), which belongs to
    /// an active diagnostic session instead. A `@botname` suffix on the
    /// command token is stripped, as group chats append one.
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if !trimmed.starts_with('/') {
            return None;
        }

        let mut parts = trimmed.split_whitespace();
        let token = parts.next()?;
        let name = token
            .trim_start_matches('/')
            .split('@')
            .next()
            .unwrap_or_default()
            .to_lowercase();
        let arg = parts.next();

        Some(match name.as_str() {
            "start" => Command::Start {
                deep_link: arg.map(str::to_string),
            },
            "help" => Command::Help,
            "diagnostic" => Command::Diagnostic,
            "cancel" => Command::Cancel,
            "siestes" => Command::Naps {
                age: arg.and_then(|a| a.parse().ok()),
            },
            "coucher" => Command::Bedtime,
            "reveil" => Command::NightWaking {
                time: arg.map(str::to_string),
            },
            "crise" => Command::Crisis,
            "regression" => Command::Regression,
            "routine" => Command::Routine {
                age: arg.and_then(|a| a.parse().ok()),
            },
            "conseil" => Command::Tip,
            "premium" => Command::Premium,
            "status" => Command::Status,
            _ => Command::Unknown,
        })
    }
}

/// Checkout parameters the router passes to the provider.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    /// Processor price identifier of the monthly plan.
    pub price_ref: String,
    /// Redirect after successful payment.
    pub success_url: String,
    /// Redirect after abandoned payment.
    pub cancel_url: String,
}

/// One inbound unit of chat traffic.
#[derive(Debug, Clone)]
pub enum Inbound {
    Text {
        user: UserId,
        display_name: Option<String>,
        handle: Option<String>,
        text: String,
    },
    Callback {
        user: UserId,
        data: String,
    },
}

/// Routes inbound chat traffic and builds the reply.
pub struct CommandRouter {
    store: Arc<dyn UserStore>,
    engine: Arc<EntitlementEngine>,
    sessions: Arc<SessionRegistry>,
    checkout: Arc<dyn CheckoutProvider>,
    checkout_settings: CheckoutSettings,
}

impl CommandRouter {
    pub fn new(
        store: Arc<dyn UserStore>,
        engine: Arc<EntitlementEngine>,
        sessions: Arc<SessionRegistry>,
        checkout: Arc<dyn CheckoutProvider>,
        checkout_settings: CheckoutSettings,
    ) -> Self {
        Self {
            store,
            engine,
            sessions,
            checkout,
            checkout_settings,
        }
    }

    /// Handles one inbound unit and returns the reply to send.
    pub async fn handle(&self, inbound: Inbound) -> OutgoingMessage {
        match inbound {
            Inbound::Text {
                user,
                display_name,
                handle,
                text,
            } => {
                // Refresh last_activity on every interaction; content
                // commands still answer when the store is down.
                if let Err(err) = self
                    .store
                    .upsert(user, display_name.as_deref(), handle.as_deref())
                    .await
                {
                    tracing::warn!(%user, error = %err, "user upsert failed");
                }

                match Command::parse(&text) {
                    Some(command) => self.dispatch(user, display_name.as_deref(), command).await,
                    None => self.session_input(user, &text).await,
                }
            }
            Inbound::Callback { user, data } => self.callback(user, &data).await,
        }
    }

    async fn dispatch(
        &self,
        user: UserId,
        display_name: Option<&str>,
        command: Command,
    ) -> OutgoingMessage {
        match command {
            Command::Start { deep_link } => match deep_link.as_deref() {
                Some("payment_success") => OutgoingMessage::text(replies::payment_success()),
                Some("payment_cancel") => OutgoingMessage::text(replies::payment_cancelled()),
                _ => OutgoingMessage::text(replies::welcome(display_name)),
            },
            Command::Help => OutgoingMessage::text(replies::help_text()),
            Command::Diagnostic => {
                let stage = self.sessions.begin(user).await;
                OutgoingMessage::text(replies::diagnostic_prompt(stage))
            }
            Command::Cancel => {
                self.sessions.cancel(user).await;
                OutgoingMessage::text(replies::diagnostic_cancelled())
            }
            Command::Naps { age: Some(age) } => OutgoingMessage::text(content::nap_schedule(age)),
            Command::Naps { age: None } => {
                OutgoingMessage::text(replies::usage("/siestes <âge>", "/siestes 6"))
            }
            Command::Bedtime => OutgoingMessage::text(content::bedtime_routine()),
            Command::NightWaking { time: Some(time) } => {
                OutgoingMessage::text(content::night_waking_protocol(&time))
            }
            Command::NightWaking { time: None } => {
                OutgoingMessage::text(replies::usage("/reveil <heure>", "/reveil 2h30"))
            }
            Command::Crisis => OutgoingMessage::text(content::crisis_protocol()),
            Command::Regression => OutgoingMessage::text(content::special_situations()),
            Command::Routine { age: Some(_) } => OutgoingMessage::text(content::daily_routine()),
            Command::Routine { age: None } => {
                OutgoingMessage::text(replies::usage("/routine <âge>", "/routine 7"))
            }
            Command::Tip => {
                let day = chrono::Utc::now().ordinal();
                OutgoingMessage::text(format!("💡 **Conseil**\n\n{}", content::tip_of_day(day)))
            }
            Command::Premium => self.premium(user).await,
            Command::Status => self.status(user).await,
            Command::Unknown => OutgoingMessage::text(replies::fallback_hint()),
        }
    }

    async fn premium(&self, user: UserId) -> OutgoingMessage {
        if self.engine.is_premium(user).await {
            let until = match self.store.get(user).await {
                Ok(record) => record.and_then(|r| r.subscription_until),
                Err(err) => {
                    tracing::warn!(%user, error = %err, "could not fetch premium expiry");
                    None
                }
            };
            return OutgoingMessage::text(replies::premium_active(until.as_ref()));
        }

        let request = CheckoutRequest {
            user_id: user,
            price_ref: self.checkout_settings.price_ref.clone(),
            success_url: self.checkout_settings.success_url.clone(),
            cancel_url: self.checkout_settings.cancel_url.clone(),
        };
        match self.checkout.create_checkout_link(request).await {
            Ok(link) => OutgoingMessage::text(replies::premium_offer())
                .with_url_button("✨ S'abonner (9,90€/mois)", link.url)
                .with_callback_button("🎯 Test DEMO gratuit", DEMO_CALLBACK),
            Err(err) => {
                tracing::error!(%user, error = %err, "checkout session creation failed");
                OutgoingMessage::text(replies::payment_error())
            }
        }
    }

    async fn status(&self, user: UserId) -> OutgoingMessage {
        match self.store.get(user).await {
            Err(err) => {
                tracing::warn!(%user, error = %err, "status lookup failed");
                OutgoingMessage::text(replies::storage_error())
            }
            Ok(None) => OutgoingMessage::text(replies::status_unregistered()),
            Ok(Some(record)) => {
                if self.engine.is_premium(user).await {
                    OutgoingMessage::text(replies::status_premium(
                        record.subscription_until.as_ref(),
                    ))
                } else {
                    OutgoingMessage::text(replies::status_free())
                }
            }
        }
    }

    async fn session_input(&self, user: UserId, text: &str) -> OutgoingMessage {
        match self.sessions.answer(user, text).await {
            Some(StepOutcome::Advanced(stage)) => {
                OutgoingMessage::text(replies::diagnostic_prompt(stage))
            }
            Some(StepOutcome::Retry(_)) => OutgoingMessage::text(replies::invalid_number()),
            Some(StepOutcome::Completed(answers)) => {
                let assessment = assess(&answers);
                let is_premium = self.engine.is_premium(user).await;
                OutgoingMessage::text(replies::diagnostic_result(
                    &answers,
                    &assessment,
                    is_premium,
                ))
            }
            None => OutgoingMessage::text(replies::fallback_hint()),
        }
    }

    async fn callback(&self, user: UserId, data: &str) -> OutgoingMessage {
        if data != DEMO_CALLBACK {
            tracing::debug!(%user, data, "unknown callback ignored");
            return OutgoingMessage::text(replies::fallback_hint());
        }

        match self.engine.activate(user, 1, None).await {
            Ok(()) => OutgoingMessage::text(replies::demo_activated()),
            Err(err) => {
                tracing::warn!(%user, error = %err, "demo activation failed");
                OutgoingMessage::text(replies::storage_error())
            }
        }
    }
}
