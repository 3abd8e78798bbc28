use crate::reference::Dimension;
use crate::scoring::{PerDimension, ScoreResult};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Opaque identity of one user session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One past submission as kept in the session history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub normalized: PerDimension<f64>,
    pub dominant: Dimension,
}

impl HistoryEntry {
    pub fn from_result(result: &ScoreResult, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            normalized: *result.normalized(),
            dominant: result.dominant(),
        }
    }

    /// Timestamp in the local timezone, to the second
    pub fn local_time(&self) -> String {
        self.timestamp
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }
}

/// Ordered submissions for a single session
#[derive(Debug, Clone)]
pub struct SessionHistory {
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    entries: Vec<HistoryEntry>,
}

impl SessionHistory {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            last_active: now,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: HistoryEntry) -> &HistoryEntry {
        self.last_active = entry.timestamp.max(self.last_active);
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Whether the session has seen no activity for longer than `ttl`
    pub fn is_idle(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now - self.last_active > ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::types::tests::sample_reference;
    use crate::scoring::{answers_from_responses, compute_scores};
    use chrono::Duration;

    fn sample_result(responses: &[i64]) -> ScoreResult {
        let reference = sample_reference();
        compute_scores(&answers_from_responses(reference.questions(), responses).unwrap())
    }

    #[test]
    fn test_entry_copies_normalized_and_dominant() {
        let mut responses = vec![3; 20];
        responses[10..15].copy_from_slice(&[5, 5, 5, 5, 5]);
        let result = sample_result(&responses);

        let now = Utc::now();
        let entry = HistoryEntry::from_result(&result, now);
        assert_eq!(entry.timestamp, now);
        assert_eq!(entry.dominant, Dimension::Process);
        assert_eq!(entry.normalized.get(Dimension::Process), 100.0);
        assert_eq!(entry.normalized.get(Dimension::Outcome), 50.0);
    }

    #[test]
    fn test_history_keeps_submission_order() {
        let start = Utc::now();
        let mut history = SessionHistory::new(start);
        let first = sample_result(&[1; 20]);
        let second = sample_result(&[5; 20]);

        history.push(HistoryEntry::from_result(&first, start + Duration::seconds(1)));
        history.push(HistoryEntry::from_result(&second, start + Duration::seconds(2)));

        let entries = history.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].normalized.get(Dimension::Value), 0.0);
        assert_eq!(entries[1].normalized.get(Dimension::Value), 100.0);
        assert_eq!(history.last_active, start + Duration::seconds(2));
    }

    #[test]
    fn test_idle_detection() {
        let start = Utc::now();
        let history = SessionHistory::new(start);
        let ttl = Duration::minutes(30);
        assert!(!history.is_idle(start + Duration::minutes(30), ttl));
        assert!(history.is_idle(start + Duration::minutes(31), ttl));
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(SessionId::new_random(), SessionId::new_random());
    }
}
