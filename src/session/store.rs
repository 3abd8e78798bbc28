use super::types::{HistoryEntry, SessionHistory, SessionId};
use crate::scoring::ScoreResult;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("unknown or expired session {0}")]
    UnknownSession(SessionId),
}

/// Per-session result history, keyed by session identity.
///
/// Each session owns its history outright; nothing is shared between
/// sessions. Sessions idle for longer than the TTL are dropped by
/// [`SessionStore::expire_idle`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    ttl: Duration,
    sessions: HashMap<SessionId, SessionHistory>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Start a new, empty session
    pub fn open(&mut self, now: DateTime<Utc>) -> SessionId {
        let id = SessionId::new_random();
        self.sessions.insert(id, SessionHistory::new(now));
        info!(session = %id, "Opened session");
        id
    }

    /// Mark a session as active. Returns false for unknown sessions.
    pub fn touch(&mut self, id: SessionId, now: DateTime<Utc>) -> bool {
        match self.sessions.get_mut(&id) {
            Some(session) => {
                session.last_active = now.max(session.last_active);
                true
            }
            None => false,
        }
    }

    /// Append a result to the session's history
    pub fn record(
        &mut self,
        id: SessionId,
        result: &ScoreResult,
        now: DateTime<Utc>,
    ) -> Result<&HistoryEntry, SessionError> {
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(SessionError::UnknownSession(id))?;
        Ok(session.push(HistoryEntry::from_result(result, now)))
    }

    /// Ordered history for a session, or None if it does not exist
    pub fn history(&self, id: SessionId) -> Option<&[HistoryEntry]> {
        self.sessions.get(&id).map(|s| s.entries())
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.contains_key(&id)
    }

    /// Drop a session and its history
    pub fn close(&mut self, id: SessionId) -> bool {
        self.sessions.remove(&id).is_some()
    }

    /// Remove sessions idle longer than the TTL; returns how many were removed
    pub fn expire_idle(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        let ttl = self.ttl;
        self.sessions.retain(|_, session| !session.is_idle(now, ttl));
        let removed = before - self.sessions.len();
        if removed > 0 {
            info!(removed, "Expired idle sessions");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::types::tests::sample_reference;
    use crate::reference::Dimension;
    use crate::scoring::{answers_from_responses, compute_scores};

    fn result_with(response: i64) -> ScoreResult {
        let reference = sample_reference();
        let responses = vec![response; reference.questions().len()];
        compute_scores(&answers_from_responses(reference.questions(), &responses).unwrap())
    }

    #[test]
    fn test_new_store_empty() {
        let store = SessionStore::new(Duration::minutes(30));
        assert!(store.is_empty());
        assert_eq!(store.ttl(), Duration::minutes(30));
    }

    #[test]
    fn test_record_and_read_history() {
        let now = Utc::now();
        let mut store = SessionStore::new(Duration::minutes(30));
        let id = store.open(now);

        assert_eq!(store.history(id).unwrap().len(), 0);

        let entry = store.record(id, &result_with(4), now).unwrap();
        assert_eq!(entry.normalized.get(Dimension::Relation), 75.0);

        store.record(id, &result_with(2), now + Duration::seconds(5)).unwrap();
        let history = store.history(id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].normalized.get(Dimension::Relation), 25.0);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let now = Utc::now();
        let mut store = SessionStore::new(Duration::minutes(30));
        let alice = store.open(now);
        let bob = store.open(now);

        store.record(alice, &result_with(5), now).unwrap();
        store.record(alice, &result_with(5), now).unwrap();
        store.record(bob, &result_with(1), now).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.history(alice).unwrap().len(), 2);
        assert_eq!(store.history(bob).unwrap().len(), 1);
        assert_eq!(
            store.history(bob).unwrap()[0].normalized.get(Dimension::Value),
            0.0
        );
    }

    #[test]
    fn test_record_into_unknown_session() {
        let now = Utc::now();
        let mut store = SessionStore::new(Duration::minutes(30));
        let id = store.open(now);
        assert!(store.close(id));
        assert!(!store.close(id));

        let err = store.record(id, &result_with(3), now).unwrap_err();
        assert_eq!(err, SessionError::UnknownSession(id));
        assert!(store.history(id).is_none());
    }

    #[test]
    fn test_expire_idle_sessions() {
        let start = Utc::now();
        let mut store = SessionStore::new(Duration::minutes(30));
        let stale = store.open(start);
        let active = store.open(start);

        assert!(store.touch(active, start + Duration::minutes(20)));
        assert_eq!(store.expire_idle(start + Duration::minutes(40)), 1);

        assert!(!store.contains(stale));
        assert!(store.contains(active));
        assert!(!store.touch(stale, start + Duration::minutes(40)));
    }

    #[test]
    fn test_recording_keeps_session_alive() {
        let start = Utc::now();
        let mut store = SessionStore::new(Duration::minutes(30));
        let id = store.open(start);
        store
            .record(id, &result_with(3), start + Duration::minutes(25))
            .unwrap();

        assert_eq!(store.expire_idle(start + Duration::minutes(50)), 0);
        assert_eq!(store.expire_idle(start + Duration::minutes(56)), 1);
        assert!(store.is_empty());
    }
}
