//! User entitlement record.
//!
//! One row per user, the sole source of truth for premium status.
//! The `is_premium` flag is a cache of a time-bounded fact; callers must
//! re-derive it from `subscription_until` on every read (lazy expiry).

use serde::{Deserialize, Serialize};

use super::foundation::{CustomerRef, Timestamp, UserId};

/// Durable per-user entitlement record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Stable external identity (unique key).
    pub user_id: UserId,

    /// Informational name from the chat transport, non-authoritative.
    pub display_name: Option<String>,

    /// Informational handle from the chat transport, non-authoritative.
    pub handle: Option<String>,

    /// Cached premium flag; valid only while `subscription_until` is in
    /// the future.
    pub is_premium: bool,

    /// End of the paid period. Absent means never subscribed.
    pub subscription_until: Option<Timestamp>,

    /// Processor customer identifier, set once a paid checkout completes.
    /// Never cleared, so cancelled users stay resolvable on later renewals.
    pub payment_customer_ref: Option<CustomerRef>,

    /// First-interaction time.
    pub created_at: Timestamp,

    /// Refreshed on every upsert.
    pub last_activity: Timestamp,
}

impl UserRecord {
    /// Fresh free-tier record for a first interaction.
    pub fn new(user_id: UserId, display_name: Option<String>, handle: Option<String>) -> Self {
        let now = Timestamp::now();
        Self {
            user_id,
            display_name,
            handle,
            is_premium: false,
            subscription_until: None,
            payment_customer_ref: None,
            created_at: now,
            last_activity: now,
        }
    }

    /// Whether the cached premium flag is stale at `now`.
    ///
    /// A set flag without an expiry date never goes stale; that state is
    /// unreachable through this crate's own writes but tolerated when the
    /// row was edited out of band.
    pub fn premium_expired_at(&self, now: Timestamp) -> bool {
        if !self.is_premium {
            return false;
        }
        match self.subscription_until {
            Some(until) => now.is_after(&until),
            None => false,
        }
    }
}
