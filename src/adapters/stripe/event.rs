//! Stripe webhook event envelope and normalization.
//!
//! Only the fields this core consumes are captured; the rest of Stripe's
//! event schema is ignored. Normalization turns the processor-specific
//! payload into the closed [`PaymentEvent`] union, with every unhandled
//! kind passing through as `Unrecognized` so processor API evolution
//! never breaks admission.

use serde::{Deserialize, Serialize};

use crate::domain::entitlement::PaymentEvent;
use crate::domain::foundation::CustomerRef;

/// Raw Stripe webhook event as received from the API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g. "checkout.session.completed").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Unix timestamp when the event was created.
    pub created: i64,

    /// Object containing event-specific data.
    pub data: StripeEventData,

    /// Whether this is a live mode event (vs test mode).
    #[serde(default)]
    pub livemode: bool,
}

/// Container for event-specific data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object that triggered the event, polymorphic per event type.
    pub object: serde_json::Value,
}

/// Checkout-session fields consumed on completion.
#[derive(Debug, Default, Deserialize)]
struct CheckoutSessionObject {
    /// Domain user id the checkout was created with.
    client_reference_id: Option<String>,
    /// Processor customer assigned by the checkout.
    customer: Option<String>,
}

/// Any object carrying only a customer reference (invoices,
/// subscriptions).
#[derive(Debug, Default, Deserialize)]
struct CustomerScopedObject {
    customer: Option<String>,
}

impl StripeEvent {
    /// Normalizes into the domain event union.
    ///
    /// Field-level shape mismatches degrade to absent fields rather than
    /// errors; the engine ignores events it cannot attribute.
    pub fn to_payment_event(&self) -> PaymentEvent {
        match self.event_type.as_str() {
            "checkout.session.completed" => {
                let object: CheckoutSessionObject =
                    serde_json::from_value(self.data.object.clone()).unwrap_or_default();
                PaymentEvent::CheckoutCompleted {
                    user: object
                        .client_reference_id
                        .as_deref()
                        .and_then(|s| s.parse().ok()),
                    customer: object.customer.map(CustomerRef::new),
                }
            }
            "invoice.payment_succeeded" => PaymentEvent::RenewalSucceeded {
                customer: self.customer_field(),
            },
            "customer.subscription.deleted" => PaymentEvent::SubscriptionCancelled {
                customer: self.customer_field(),
            },
            other => PaymentEvent::Unrecognized {
                kind: other.to_string(),
            },
        }
    }

    fn customer_field(&self) -> Option<CustomerRef> {
        let object: CustomerScopedObject =
            serde_json::from_value(self.data.object.clone()).unwrap_or_default();
        object.customer.map(CustomerRef::new)
    }
}
