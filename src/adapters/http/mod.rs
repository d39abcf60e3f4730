//! HTTP adapter: the payment-webhook endpoint.

mod webhook;

pub use webhook::{webhook_routes, WebhookState};
