//! User store port: durable mapping from user identity to entitlement record.
//!
//! The store is the single source of truth for premium status. Every
//! operation must be atomic at single-record granularity — implementations
//! issue one conditional statement per call rather than read-then-write
//! pairs, so the chat path and the webhook path cannot lose updates when
//! they race on the same user.
//!
//! Absence is expected, not an error: `get` and `find_by_customer_ref`
//! return `Option`. The only error is the transient
//! [`StoreError::Unavailable`], which callers degrade on rather than
//! propagate as a crash.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{CustomerRef, Timestamp, UserId};
use crate::domain::user::UserRecord;

/// Storage failure. Always transient from the caller's perspective: the
/// user is told to retry, the webhook is re-acknowledged, nothing crashes.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The backing store could not be reached or the statement failed.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Wraps an underlying driver error message.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        StoreError::Unavailable(reason.into())
    }
}

/// Port for the durable user-record store.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Creates the record on first call, refreshes `last_activity`
    /// thereafter. Idempotent.
    async fn upsert(
        &self,
        user_id: UserId,
        display_name: Option<&str>,
        handle: Option<&str>,
    ) -> Result<(), StoreError>;

    /// Fetches a record. `None` means the user has never interacted.
    async fn get(&self, user_id: UserId) -> Result<Option<UserRecord>, StoreError>;

    /// Unconditional overwrite of `is_premium = true` and
    /// `subscription_until = until`. The customer reference is set only
    /// when provided, never cleared here.
    async fn set_premium(
        &self,
        user_id: UserId,
        until: Timestamp,
        customer: Option<&CustomerRef>,
    ) -> Result<(), StoreError>;

    /// Sets `is_premium = false` only; all other fields untouched, so the
    /// user stays resolvable by customer reference on a later renewal.
    async fn clear_premium(&self, user_id: UserId) -> Result<(), StoreError>;

    /// Resolves a processor customer identifier to a domain user.
    async fn find_by_customer_ref(
        &self,
        customer: &CustomerRef,
    ) -> Result<Option<UserId>, StoreError>;
}
