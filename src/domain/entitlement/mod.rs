//! Subscription-state reconciliation.
//!
//! Keeps a user's premium entitlement consistent across three independent
//! signals arriving asynchronously and out of order from the payment
//! processor: an explicit activation, a recurring renewal confirmation,
//! and a cancellation.

mod engine;
mod events;

pub use engine::{EntitlementEngine, EventOutcome};
pub use events::PaymentEvent;
