//! Session-scoped order list state storage.
//!
//! Each session owns exactly one [`OrderListState`], created with defaults
//! on first access and discarded when the session ends or sits idle past
//! the store's idle timeout. Access to a single state is serialized through
//! its own async mutex; the store itself holds no other shared state.

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

use orderlist_core::SessionId;
use orderlist_orders::OrderListState;

pub type SharedOrderListState = Arc<tokio::sync::Mutex<OrderListState>>;

pub trait SessionStore: Send + Sync {
    /// Live state for the session, if any. Refreshes its idle clock.
    fn get(&self, session_id: SessionId) -> Option<SharedOrderListState>;

    /// Existing state for the session, or a fresh default one.
    fn get_or_create(&self, session_id: SessionId) -> SharedOrderListState;

    /// Discard the session's state. Returns whether a state existed.
    fn end_session(&self, session_id: SessionId) -> bool;

    /// The state a session would start with; nothing is stored.
    fn fresh_state(&self) -> OrderListState;
}

#[derive(Debug)]
struct SessionEntry {
    state: SharedOrderListState,
    last_access: Instant,
}

#[derive(Debug)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<SessionId, SessionEntry>>,
    default_view_size: NonZeroU32,
    idle_timeout: Option<Duration>,
}

impl InMemorySessionStore {
    /// `default_view_size` seeds the page size of every new session.
    /// Sessions never expire unless an idle timeout is set.
    pub fn new(default_view_size: NonZeroU32) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            default_view_size,
            idle_timeout: None,
        }
    }

    /// Drop sessions not touched for `idle_timeout`.
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = Some(idle_timeout);
        self
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_expired(&self, entry: &SessionEntry, now: Instant) -> bool {
        self.idle_timeout
            .is_some_and(|timeout| now.saturating_duration_since(entry.last_access) >= timeout)
    }

    fn new_state(&self) -> SharedOrderListState {
        Arc::new(tokio::sync::Mutex::new(self.fresh_state()))
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, session_id: SessionId) -> Option<SharedOrderListState> {
        let mut sessions = self.sessions.lock().ok()?;
        let now = Instant::now();

        if self.is_expired(sessions.get(&session_id)?, now) {
            sessions.remove(&session_id);
            tracing::debug!(session_id = %session_id, "order list state expired");
            return None;
        }

        let entry = sessions.get_mut(&session_id)?;
        entry.last_access = now;
        Some(entry.state.clone())
    }

    fn get_or_create(&self, session_id: SessionId) -> SharedOrderListState {
        // A poisoned map still must not hand out shared state across sessions.
        let Ok(mut sessions) = self.sessions.lock() else {
            return self.new_state();
        };
        let now = Instant::now();

        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_expired(entry, now));
        let expired = before - sessions.len();
        if expired > 0 {
            tracing::debug!(expired, "swept idle order list states");
        }

        let entry = sessions.entry(session_id).or_insert_with(|| {
            tracing::debug!(session_id = %session_id, "creating order list state");
            SessionEntry {
                state: self.new_state(),
                last_access: now,
            }
        });
        entry.last_access = now;
        entry.state.clone()
    }

    fn end_session(&self, session_id: SessionId) -> bool {
        match self.sessions.lock() {
            Ok(mut sessions) => sessions.remove(&session_id).is_some(),
            Err(_) => false,
        }
    }

    fn fresh_state(&self) -> OrderListState {
        OrderListState::new(self.default_view_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderlist_orders::{ListUpdate, PageChange};

    fn store() -> InMemorySessionStore {
        InMemorySessionStore::new(NonZeroU32::new(15).unwrap())
    }

    #[tokio::test]
    async fn first_access_creates_state_with_configured_view_size() {
        let store = store();
        let session = SessionId::new();
        assert!(store.get(session).is_none());

        let state = store.get_or_create(session);
        assert_eq!(state.lock().await.view_size(), 15);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn sessions_do_not_share_state() {
        let store = store();
        let (a, b) = (SessionId::new(), SessionId::new());

        store
            .get_or_create(a)
            .lock()
            .await
            .apply_update(&ListUpdate::PageChange(PageChange::new("5", "3")));

        assert_eq!(store.get_or_create(a).lock().await.view_index(), 3);
        assert_eq!(store.get_or_create(b).lock().await.view_index(), 0);
        assert!(Arc::ptr_eq(&store.get_or_create(a), &store.get(a).unwrap()));
    }

    #[tokio::test]
    async fn ending_a_session_discards_its_state() {
        let store = store();
        let session = SessionId::new();
        store
            .get_or_create(session)
            .lock()
            .await
            .apply_update(&ListUpdate::PageChange(PageChange::new("5", "3")));

        assert!(store.end_session(session));
        assert!(!store.end_session(session));
        assert!(store.is_empty());
        assert_eq!(store.get_or_create(session).lock().await.view_index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_sessions_are_swept_on_the_next_session_access() {
        let store = store().with_idle_timeout(Duration::from_secs(60));
        let (idle, active) = (SessionId::new(), SessionId::new());
        store.get_or_create(idle);
        store.get_or_create(active);

        tokio::time::advance(Duration::from_secs(40)).await;
        assert!(store.get(active).is_some());

        tokio::time::advance(Duration::from_secs(30)).await;
        store.get_or_create(SessionId::new());

        assert_eq!(store.len(), 2);
        assert!(store.get(idle).is_none());
        assert!(store.get(active).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn expired_session_starts_over_with_defaults() {
        let store = store().with_idle_timeout(Duration::from_secs(60));
        let session = SessionId::new();
        store
            .get_or_create(session)
            .lock()
            .await
            .apply_update(&ListUpdate::PageChange(PageChange::new("5", "3")));

        tokio::time::advance(Duration::from_secs(61)).await;

        assert!(store.get(session).is_none());
        assert!(store.is_empty());
        let state = store.get_or_create(session);
        assert_eq!(*state.lock().await, store.fresh_state());
    }

    #[tokio::test(start_paused = true)]
    async fn without_idle_timeout_sessions_are_kept() {
        let store = store();
        let session = SessionId::new();
        store.get_or_create(session);

        tokio::time::advance(Duration::from_secs(24 * 60 * 60)).await;

        assert!(store.get(session).is_some());
    }

    #[test]
    fn fresh_state_is_not_stored() {
        let store = store();
        assert_eq!(store.fresh_state().view_size(), 15);
        assert!(store.is_empty());
    }
}
