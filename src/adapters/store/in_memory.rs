//! In-memory user store for testing and single-process development.
//!
//! Observable semantics match the PostgreSQL adapter: upsert refreshes
//! `last_activity` only, `set_premium` never clears the customer
//! reference, premium updates on unknown users are no-op successes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{CustomerRef, Timestamp, UserId};
use crate::domain::user::UserRecord;
use crate::ports::{StoreError, UserStore};

/// HashMap-backed [`UserStore`] with a failure toggle for exercising
/// the `StorageUnavailable` paths.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    records: RwLock<HashMap<UserId, UserRecord>>,
    unavailable: AtomicBool,
}

impl InMemoryUserStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every operation fails with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("simulated outage"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn upsert(
        &self,
        user_id: UserId,
        display_name: Option<&str>,
        handle: Option<&str>,
    ) -> Result<(), StoreError> {
        self.check_available()?;
        let mut records = self.records.write().await;
        match records.get_mut(&user_id) {
            Some(record) => record.last_activity = Timestamp::now(),
            None => {
                records.insert(
                    user_id,
                    UserRecord::new(
                        user_id,
                        display_name.map(str::to_string),
                        handle.map(str::to_string),
                    ),
                );
            }
        }
        Ok(())
    }

    async fn get(&self, user_id: UserId) -> Result<Option<UserRecord>, StoreError> {
        self.check_available()?;
        Ok(self.records.read().await.get(&user_id).cloned())
    }

    async fn set_premium(
        &self,
        user_id: UserId,
        until: Timestamp,
        customer: Option<&CustomerRef>,
    ) -> Result<(), StoreError> {
        self.check_available()?;
        let mut records = self.records.write().await;
        if let Some(record) = records.get_mut(&user_id) {
            record.is_premium = true;
            record.subscription_until = Some(until);
            if let Some(customer) = customer {
                record.payment_customer_ref = Some(customer.clone());
            }
        }
        Ok(())
    }

    async fn clear_premium(&self, user_id: UserId) -> Result<(), StoreError> {
        self.check_available()?;
        let mut records = self.records.write().await;
        if let Some(record) = records.get_mut(&user_id) {
            record.is_premium = false;
        }
        Ok(())
    }

    async fn find_by_customer_ref(
        &self,
        customer: &CustomerRef,
    ) -> Result<Option<UserId>, StoreError> {
        self.check_available()?;
        Ok(self
            .records
            .read()
            .await
            .values()
            .find(|r| r.payment_customer_ref.as_ref() == Some(customer))
            .map(|r| r.user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserId {
        UserId::new(101)
    }

    #[tokio::test]
    async fn upsert_creates_then_refreshes_activity_only() {
        let store = InMemoryUserStore::new();
        store.upsert(user(), Some("Léa"), Some("lea_92")).await.unwrap();

        let created = store.get(user()).await.unwrap().unwrap();
        store.upsert(user(), Some("Renamed"), None).await.unwrap();
        let refreshed = store.get(user()).await.unwrap().unwrap();

        // Second upsert is a no-op apart from last_activity.
        assert_eq!(refreshed.display_name.as_deref(), Some("Léa"));
        assert!(!refreshed.last_activity.is_before(&created.last_activity));
    }

    #[tokio::test]
    async fn set_premium_keeps_existing_customer_ref_when_absent() {
        let store = InMemoryUserStore::new();
        store.upsert(user(), None, None).await.unwrap();
        let customer = CustomerRef::new("cus_9");

        store
            .set_premium(user(), Timestamp::now().add_days(30), Some(&customer))
            .await
            .unwrap();
        store
            .set_premium(user(), Timestamp::now().add_days(60), None)
            .await
            .unwrap();

        let record = store.get(user()).await.unwrap().unwrap();
        assert_eq!(record.payment_customer_ref, Some(customer));
    }

    #[tokio::test]
    async fn clear_premium_touches_only_the_flag() {
        let store = InMemoryUserStore::new();
        store.upsert(user(), None, None).await.unwrap();
        let customer = CustomerRef::new("cus_9");
        let until = Timestamp::now().add_days(30);
        store.set_premium(user(), until, Some(&customer)).await.unwrap();

        store.clear_premium(user()).await.unwrap();

        let record = store.get(user()).await.unwrap().unwrap();
        assert!(!record.is_premium);
        assert_eq!(record.subscription_until, Some(until));
        assert_eq!(record.payment_customer_ref, Some(customer));
    }

    #[tokio::test]
    async fn find_by_customer_ref_resolves_after_cancellation() {
        let store = InMemoryUserStore::new();
        store.upsert(user(), None, None).await.unwrap();
        let customer = CustomerRef::new("cus_9");
        store
            .set_premium(user(), Timestamp::now().add_days(30), Some(&customer))
            .await
            .unwrap();
        store.clear_premium(user()).await.unwrap();

        let found = store.find_by_customer_ref(&customer).await.unwrap();
        assert_eq!(found, Some(user()));
    }

    #[tokio::test]
    async fn unknown_customer_ref_is_none_not_error() {
        let store = InMemoryUserStore::new();
        let found = store
            .find_by_customer_ref(&CustomerRef::new("cus_missing"))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn unavailable_toggle_fails_every_operation() {
        let store = InMemoryUserStore::new();
        store.set_unavailable(true);

        assert!(store.upsert(user(), None, None).await.is_err());
        assert!(store.get(user()).await.is_err());
        assert!(store.clear_premium(user()).await.is_err());
    }
}
