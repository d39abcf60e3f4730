//! Entitlement engine: idempotent, monotonic premium transitions.
//!
//! Expiry is enforced lazily, on read. There is no background sweep: a
//! lapsed subscription is corrected the next time anyone evaluates the
//! user's status, which is sufficient because every gated feature checks
//! [`EntitlementEngine::is_premium`] first.
//!
//! Storage failures during event handling leave local state unmodified
//! and are reported to the caller; the webhook boundary still
//! acknowledges receipt, and correctness is recovered on the processor's
//! next retry or renewal cycle.

use std::sync::Arc;

use crate::domain::foundation::{CustomerRef, Timestamp, UserId};
use crate::ports::{StoreError, UserStore};

use super::events::PaymentEvent;

/// Result of admitting one payment event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event mutated the user store.
    Applied,
    /// The event was acknowledged without effect.
    Ignored(&'static str),
}

/// Applies payment events and direct activation calls to the user store.
pub struct EntitlementEngine {
    store: Arc<dyn UserStore>,
}

impl EntitlementEngine {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Whether the user is premium right now.
    ///
    /// Re-derives the cached flag from `subscription_until` and corrects
    /// it when stale. Degrades to `false` on storage failure: gated
    /// content is withheld rather than leaked while the store is down.
    pub async fn is_premium(&self, user_id: UserId) -> bool {
        let record = match self.store.get(user_id).await {
            Ok(Some(record)) => record,
            Ok(None) => return false,
            Err(err) => {
                tracing::warn!(%user_id, error = %err, "entitlement check degraded to non-premium");
                return false;
            }
        };

        if !record.is_premium {
            return false;
        }

        if record.premium_expired_at(Timestamp::now()) {
            // Correct the stale cache; a failed correction changes nothing
            // observable since the next read re-derives anyway.
            if let Err(err) = self.store.clear_premium(user_id).await {
                tracing::warn!(%user_id, error = %err, "failed to clear expired premium flag");
            }
            tracing::info!(%user_id, "premium expired");
            return false;
        }

        true
    }

    /// Grants premium for `months` 30-day months from now.
    ///
    /// Always overwrites rather than extends: a second activation before
    /// expiry discards the unused days of the previous period.
    pub async fn activate(
        &self,
        user_id: UserId,
        months: u32,
        customer: Option<&CustomerRef>,
    ) -> Result<(), StoreError> {
        let until = Timestamp::now().add_months(i64::from(months));
        self.store.set_premium(user_id, until, customer).await?;
        tracing::info!(%user_id, months, "premium activated");
        Ok(())
    }

    /// Revokes premium. Idempotent: deactivating a non-premium user is a
    /// no-op success.
    pub async fn deactivate(&self, user_id: UserId) -> Result<(), StoreError> {
        self.store.clear_premium(user_id).await?;
        tracing::info!(%user_id, "premium deactivated");
        Ok(())
    }

    /// Admits one normalized processor event.
    ///
    /// An `Err` means a storage failure left the event unapplied; the
    /// webhook boundary must still acknowledge it to stop redelivery.
    pub async fn handle_payment_event(
        &self,
        event: PaymentEvent,
    ) -> Result<EventOutcome, StoreError> {
        match event {
            PaymentEvent::CheckoutCompleted { user, customer } => match user {
                Some(user_id) => {
                    self.activate(user_id, 1, customer.as_ref()).await?;
                    Ok(EventOutcome::Applied)
                }
                None => {
                    // Unrecoverable without a user reference.
                    tracing::warn!("checkout completion without user reference, dropping event");
                    Ok(EventOutcome::Ignored("missing user reference"))
                }
            },
            PaymentEvent::RenewalSucceeded { customer } => {
                match self.resolve_customer(customer.as_ref()).await? {
                    Some(user_id) => {
                        self.activate(user_id, 1, None).await?;
                        tracing::info!(%user_id, "subscription renewed");
                        Ok(EventOutcome::Applied)
                    }
                    None => {
                        tracing::info!("renewal for unknown customer reference ignored");
                        Ok(EventOutcome::Ignored("unresolvable customer reference"))
                    }
                }
            }
            PaymentEvent::SubscriptionCancelled { customer } => {
                match self.resolve_customer(customer.as_ref()).await? {
                    Some(user_id) => {
                        self.deactivate(user_id).await?;
                        Ok(EventOutcome::Applied)
                    }
                    None => {
                        tracing::info!("cancellation for unknown customer reference ignored");
                        Ok(EventOutcome::Ignored("unresolvable customer reference"))
                    }
                }
            }
            PaymentEvent::Unrecognized { kind } => {
                tracing::debug!(kind = %kind, "unrecognized payment event acknowledged");
                Ok(EventOutcome::Ignored("unrecognized event kind"))
            }
        }
    }

    async fn resolve_customer(
        &self,
        customer: Option<&CustomerRef>,
    ) -> Result<Option<UserId>, StoreError> {
        match customer {
            Some(customer) => self.store.find_by_customer_ref(customer).await,
            None => Ok(None),
        }
    }
}
