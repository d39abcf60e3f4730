//! Stripe webhook endpoint.
//!
//! Status contract, which the processor uses to decide redelivery, is
//! exact: 200 on successful admission including no-op outcomes, 400 on
//! signature failure or malformed payload. A storage failure is logged
//! and still acknowledged with 200 — local state is left unmodified and
//! correctness is recovered on the processor's next retry or renewal
//! cycle, not by redelivering an event we cannot currently apply.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::adapters::stripe::StripeWebhookVerifier;
use crate::domain::entitlement::{EntitlementEngine, EventOutcome};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared state for the webhook route.
#[derive(Clone)]
pub struct WebhookState {
    pub verifier: Arc<StripeWebhookVerifier>,
    pub engine: Arc<EntitlementEngine>,
}

/// Router exposing `POST /webhook/stripe`.
pub fn webhook_routes(state: WebhookState) -> Router {
    Router::new()
        .route("/webhook/stripe", post(handle_stripe_webhook))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
}

/// POST /webhook/stripe — verify, normalize, admit.
async fn handle_stripe_webhook(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let Some(signature) = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
    else {
        tracing::warn!("webhook without Stripe-Signature header rejected");
        return StatusCode::BAD_REQUEST;
    };

    let event = match state.verifier.verify_and_parse(&body, signature) {
        Ok(event) => event,
        Err(err) => {
            tracing::warn!(error = %err, "webhook rejected");
            return StatusCode::BAD_REQUEST;
        }
    };

    match state.engine.handle_payment_event(event.to_payment_event()).await {
        Ok(EventOutcome::Applied) => {
            tracing::info!(event_id = %event.id, kind = %event.event_type, "webhook applied");
        }
        Ok(EventOutcome::Ignored(reason)) => {
            tracing::info!(
                event_id = %event.id,
                kind = %event.event_type,
                reason,
                "webhook acknowledged without effect"
            );
        }
        Err(err) => {
            tracing::error!(
                event_id = %event.id,
                error = %err,
                "webhook not applied; acknowledging to stop redelivery"
            );
        }
    }

    StatusCode::OK
}
