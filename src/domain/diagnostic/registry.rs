//! Shared map of active diagnostic sessions.
//!
//! Keyed by user id; entries are created by `/diagnostic`, fed by that
//! user's own message sequence (the chat transport orders messages per
//! chat, so no per-user locking is needed beyond the map itself), and
//! removed the instant a session completes or is cancelled.
//!
//! Idle sessions are reaped lazily, mirroring the entitlement expiry
//! pattern: an entry untouched for longer than the idle TTL is discarded
//! on its next lookup rather than by a background timer.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::domain::foundation::{Timestamp, UserId};

use super::session::{DiagnosticSession, Stage, StepOutcome};

/// Sessions untouched this long are treated as abandoned.
const DEFAULT_IDLE_TTL_SECS: i64 = 30 * 60;

#[derive(Debug)]
struct SessionEntry {
    session: DiagnosticSession,
    last_touched: Timestamp,
}

/// Concurrent registry of in-flight diagnostic sessions.
///
/// The lock is held only for individual map operations, never across
/// awaited I/O, so concurrently handled users do not serialize on each
/// other in any observable way.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<UserId, SessionEntry>>,
    idle_ttl_secs: i64,
}

impl SessionRegistry {
    /// Registry with the default 30-minute idle TTL.
    pub fn new() -> Self {
        Self::with_idle_ttl_secs(DEFAULT_IDLE_TTL_SECS)
    }

    /// Registry with a custom idle TTL, in seconds.
    pub fn with_idle_ttl_secs(idle_ttl_secs: i64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl_secs,
        }
    }

    /// Starts a fresh session for the user, replacing any existing one.
    /// Returns the first stage to prompt for.
    pub async fn begin(&self, user_id: UserId) -> Stage {
        let session = DiagnosticSession::start();
        let stage = session.stage();
        self.sessions.write().await.insert(
            user_id,
            SessionEntry {
                session,
                last_touched: Timestamp::now(),
            },
        );
        stage
    }

    /// Whether the user has a live (non-stale) session.
    pub async fn is_active(&self, user_id: UserId) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get(&user_id) {
            Some(entry) if self.is_stale(entry) => {
                sessions.remove(&user_id);
                tracing::debug!(%user_id, "stale diagnostic session reaped");
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Feeds a free-text message into the user's session.
    ///
    /// Returns `None` when no live session exists. Completed sessions are
    /// removed before the outcome is returned.
    pub async fn answer(&self, user_id: UserId, input: &str) -> Option<StepOutcome> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&user_id)?;

        if self.is_stale(entry) {
            sessions.remove(&user_id);
            tracing::debug!(%user_id, "stale diagnostic session reaped");
            return None;
        }

        let outcome = entry.session.answer(input);
        entry.last_touched = Timestamp::now();

        if matches!(outcome, StepOutcome::Completed(_)) {
            sessions.remove(&user_id);
        }
        Some(outcome)
    }

    /// Destroys the user's session without a recommendation.
    /// Returns whether a session existed.
    pub async fn cancel(&self, user_id: UserId) -> bool {
        self.sessions.write().await.remove(&user_id).is_some()
    }

    fn is_stale(&self, entry: &SessionEntry) -> bool {
        Timestamp::now().secs_since(&entry.last_touched) > self.idle_ttl_secs
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
