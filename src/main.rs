//! Process entry point: wires config, storage, Stripe and Telegram, then
//! runs the webhook server and the chat polling loop side by side.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use coach_sommeil::adapters::http::{webhook_routes, WebhookState};
use coach_sommeil::adapters::store::{init_schema, PostgresUserStore};
use coach_sommeil::adapters::stripe::{StripeCheckoutAdapter, StripeWebhookVerifier};
use coach_sommeil::adapters::telegram::{ChatUpdate, TelegramClient};
use coach_sommeil::application::{CheckoutSettings, CommandRouter, Inbound};
use coach_sommeil::config::AppConfig;
use coach_sommeil::domain::diagnostic::SessionRegistry;
use coach_sommeil::domain::entitlement::EntitlementEngine;
use coach_sommeil::ports::{ChatSender, UserStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Missing required configuration is the only process-fatal condition.
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .with_target(false)
        .init();

    if config.payment.is_test_mode() {
        tracing::warn!("Stripe configured in test mode");
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .idle_timeout(config.database.idle_timeout())
        .connect(&config.database.url)
        .await?;
    init_schema(&pool).await?;

    let store: Arc<dyn UserStore> = Arc::new(PostgresUserStore::new(pool));
    let engine = Arc::new(EntitlementEngine::new(store.clone()));
    let sessions = Arc::new(SessionRegistry::new());
    let checkout = Arc::new(StripeCheckoutAdapter::new(SecretString::new(
        config.payment.stripe_api_key.clone(),
    )));
    let router = Arc::new(CommandRouter::new(
        store,
        engine.clone(),
        sessions,
        checkout,
        CheckoutSettings {
            price_ref: config.payment.stripe_price_id.clone(),
            success_url: config.telegram.deep_link("payment_success"),
            cancel_url: config.telegram.deep_link("payment_cancel"),
        },
    ));

    // Payment webhook path, independent of the chat path.
    let webhook_state = WebhookState {
        verifier: Arc::new(StripeWebhookVerifier::new(SecretString::new(
            config.payment.stripe_webhook_secret.clone(),
        ))),
        engine,
    };
    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "payment webhook server listening");
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, webhook_routes(webhook_state)).await {
            tracing::error!(error = %err, "webhook server exited");
        }
    });

    // Chat path: long-poll the transport and answer sequentially, which
    // preserves the per-chat ordering the diagnostic sessions rely on.
    let telegram = Arc::new(TelegramClient::new(SecretString::new(
        config.telegram.bot_token.clone(),
    )));
    tracing::info!("Coach Sommeil started");

    let mut offset = 0i64;
    loop {
        let batch = match telegram
            .get_updates(offset, config.telegram.poll_timeout_secs)
            .await
        {
            Ok(batch) => batch,
            Err(err) => {
                tracing::warn!(error = %err, "update poll failed, backing off");
                tokio::time::sleep(Duration::from_secs(5)).await;
                continue;
            }
        };
        offset = batch.next_offset;

        for update in batch.updates {
            let (chat, inbound) = match update {
                ChatUpdate::Message {
                    user,
                    display_name,
                    handle,
                    text,
                } => (
                    user,
                    Inbound::Text {
                        user,
                        display_name,
                        handle,
                        text,
                    },
                ),
                ChatUpdate::Callback {
                    user,
                    callback_id,
                    data,
                } => {
                    if let Err(err) = telegram.answer_callback(&callback_id).await {
                        tracing::warn!(error = %err, "failed to acknowledge callback");
                    }
                    (user, Inbound::Callback { user, data })
                }
            };

            let reply = router.handle(inbound).await;
            if let Err(err) = telegram.send(chat, reply).await {
                tracing::warn!(%chat, error = %err, "failed to deliver reply");
            }
        }
    }
}
