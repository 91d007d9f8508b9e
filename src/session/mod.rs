//! Per-browser-session storage of the latest analysis.
//!
//! A session holds exactly two things: the raw input and the result it
//! produced. Entries are created on the first successful analysis, replaced by
//! the next one, and removed on explicit clear or after sitting idle past the
//! configured TTL.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::analysis::AnalysisResult;

/// Stored state of one session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEntry {
    pub input: String,
    pub result: AnalysisResult,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// In-memory session store shared across request handlers.
#[derive(Debug, Clone)]
pub struct SessionStore {
    entries: Arc<RwLock<HashMap<String, SessionEntry>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::seconds(
                i64::try_from(ttl_secs)
                    .unwrap_or(i64::MAX)
                    .min(i64::MAX / 1000),
            ),
        }
    }

    /// Fresh random session id.
    pub fn new_session_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Store the latest analysis for `session_id`, replacing any previous one.
    pub async fn save(&self, session_id: &str, input: String, result: AnalysisResult) {
        let now = Utc::now();
        let mut entries = self.entries.write().await;

        let before = entries.len();
        let ttl = self.ttl;
        entries.retain(|_, entry| now - entry.updated_at <= ttl);
        let purged = before - entries.len();
        if purged > 0 {
            debug!(purged, "Purged idle sessions");
        }

        let created_at = entries
            .get(session_id)
            .map(|entry| entry.created_at)
            .unwrap_or(now);
        entries.insert(
            session_id.to_string(),
            SessionEntry {
                input,
                result,
                created_at,
                updated_at: now,
            },
        );
    }

    /// Latest analysis for `session_id`, unless it has expired.
    pub async fn get(&self, session_id: &str) -> Option<SessionEntry> {
        let entries = self.entries.read().await;
        entries
            .get(session_id)
            .filter(|entry| Utc::now() - entry.updated_at <= self.ttl)
            .cloned()
    }

    /// Drop the session's analysis. Returns whether anything was stored.
    pub async fn clear(&self, session_id: &str) -> bool {
        self.entries.write().await.remove(session_id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
