//! PostgreSQL implementation of the UserStore port.
//!
//! Every operation is a single conditional statement so per-record
//! atomicity holds at the storage layer: the chat path and the webhook
//! path can race on the same user without losing updates. Pool acquire
//! timeouts bound every call; any driver failure surfaces as
//! `StoreError::Unavailable`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{CustomerRef, Timestamp, UserId};
use crate::domain::user::UserRecord;
use crate::ports::{StoreError, UserStore};

/// Creates the `users` table and its lookup index if absent.
///
/// Runs once at startup; safe to re-run.
pub async fn init_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            user_id BIGINT PRIMARY KEY,
            display_name TEXT,
            handle TEXT,
            is_premium BOOLEAN NOT NULL DEFAULT FALSE,
            subscription_until TIMESTAMPTZ,
            payment_customer_ref TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            last_activity TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| StoreError::unavailable(format!("failed to create users table: {e}")))?;

    // Renewal and cancellation events resolve users by customer reference.
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_users_payment_customer_ref \
         ON users (payment_customer_ref)",
    )
    .execute(pool)
    .await
    .map_err(|e| StoreError::unavailable(format!("failed to create customer index: {e}")))?;

    tracing::info!("database schema ready");
    Ok(())
}

/// PostgreSQL-backed [`UserStore`].
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    /// Wraps an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user record.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    user_id: i64,
    display_name: Option<String>,
    handle: Option<String>,
    is_premium: bool,
    subscription_until: Option<DateTime<Utc>>,
    payment_customer_ref: Option<String>,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        UserRecord {
            user_id: UserId::new(row.user_id),
            display_name: row.display_name,
            handle: row.handle,
            is_premium: row.is_premium,
            subscription_until: row.subscription_until.map(Timestamp::from_datetime),
            payment_customer_ref: row.payment_customer_ref.map(CustomerRef::new),
            created_at: Timestamp::from_datetime(row.created_at),
            last_activity: Timestamp::from_datetime(row.last_activity),
        }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn upsert(
        &self,
        user_id: UserId,
        display_name: Option<&str>,
        handle: Option<&str>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, display_name, handle, is_premium, created_at, last_activity)
            VALUES ($1, $2, $3, FALSE, now(), now())
            ON CONFLICT (user_id) DO UPDATE SET last_activity = now()
            "#,
        )
        .bind(user_id.as_i64())
        .bind(display_name)
        .bind(handle)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::unavailable(format!("failed to upsert user: {e}")))?;

        Ok(())
    }

    async fn get(&self, user_id: UserId) -> Result<Option<UserRecord>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT user_id, display_name, handle, is_premium, subscription_until,
                   payment_customer_ref, created_at, last_activity
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::unavailable(format!("failed to fetch user: {e}")))?;

        Ok(row.map(UserRecord::from))
    }

    async fn set_premium(
        &self,
        user_id: UserId,
        until: Timestamp,
        customer: Option<&CustomerRef>,
    ) -> Result<(), StoreError> {
        // COALESCE keeps the stored reference when none is provided, so
        // the whole overwrite stays a single statement.
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_premium = TRUE,
                subscription_until = $2,
                payment_customer_ref = COALESCE($3, payment_customer_ref)
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_i64())
        .bind(until.as_datetime())
        .bind(customer.map(CustomerRef::as_str))
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::unavailable(format!("failed to set premium: {e}")))?;

        if result.rows_affected() == 0 {
            tracing::warn!(%user_id, "premium update matched no user row");
        }
        Ok(())
    }

    async fn clear_premium(&self, user_id: UserId) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET is_premium = FALSE WHERE user_id = $1")
            .bind(user_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::unavailable(format!("failed to clear premium: {e}")))?;

        Ok(())
    }

    async fn find_by_customer_ref(
        &self,
        customer: &CustomerRef,
    ) -> Result<Option<UserId>, StoreError> {
        let id: Option<i64> =
            sqlx::query_scalar("SELECT user_id FROM users WHERE payment_customer_ref = $1")
                .bind(customer.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    StoreError::unavailable(format!("failed to resolve customer reference: {e}"))
                })?;

        Ok(id.map(UserId::new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_converts_to_record() {
        let now = Utc::now();
        let row = UserRow {
            user_id: 42,
            display_name: Some("Léa".to_string()),
            handle: Some("lea_92".to_string()),
            is_premium: true,
            subscription_until: Some(now),
            payment_customer_ref: Some("cus_abc".to_string()),
            created_at: now,
            last_activity: now,
        };

        let record = UserRecord::from(row);

        assert_eq!(record.user_id, UserId::new(42));
        assert_eq!(record.display_name.as_deref(), Some("Léa"));
        assert!(record.is_premium);
        assert_eq!(
            record.payment_customer_ref,
            Some(CustomerRef::new("cus_abc"))
        );
    }

    #[test]
    fn row_with_nulls_converts_to_free_record() {
        let now = Utc::now();
        let row = UserRow {
            user_id: 7,
            display_name: None,
            handle: None,
            is_premium: false,
            subscription_until: None,
            payment_customer_ref: None,
            created_at: now,
            last_activity: now,
        };

        let record = UserRecord::from(row);

        assert!(!record.is_premium);
        assert!(record.subscription_until.is_none());
        assert!(record.payment_customer_ref.is_none());
    }
}
