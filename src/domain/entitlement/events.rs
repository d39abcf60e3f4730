//! Normalized payment-processor events.
//!
//! A closed tagged union with an explicit no-op arm: event kinds the
//! processor adds later land in [`PaymentEvent::Unrecognized`] and are
//! acknowledged without effect instead of erroring.

use crate::domain::foundation::{CustomerRef, UserId};

/// Domain event distilled from a verified processor callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    /// A user completed a hosted checkout. Carries the domain user
    /// reference the checkout was created with, when the processor
    /// echoed one back, plus the newly assigned customer identifier.
    CheckoutCompleted {
        user: Option<UserId>,
        customer: Option<CustomerRef>,
    },

    /// A recurring payment succeeded. Identified by customer only.
    RenewalSucceeded { customer: Option<CustomerRef> },

    /// The subscription was cancelled at the processor.
    SubscriptionCancelled { customer: Option<CustomerRef> },

    /// Any event kind this core does not consume.
    Unrecognized { kind: String },
}

impl PaymentEvent {
    /// Short kind label for logging.
    pub fn kind(&self) -> &str {
        match self {
            PaymentEvent::CheckoutCompleted { .. } => "checkout_completed",
            PaymentEvent::RenewalSucceeded { .. } => "renewal_succeeded",
            PaymentEvent::SubscriptionCancelled { .. } => "subscription_cancelled",
            PaymentEvent::Unrecognized { kind } => kind,
        }
    }
}
