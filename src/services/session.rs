use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::form::SessionKey;
use crate::models::identity::VerificationResult;
use crate::models::verification::StoredVerification;

/// How long an untouched form session is kept.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug)]
struct Entry {
    latest_seq: u64,
    stored: Option<StoredVerification>,
    touched_at: DateTime<Utc>,
}

impl Entry {
    fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        (now - self.touched_at)
            .to_std()
            .map(|age| age >= ttl)
            .unwrap_or(false)
    }
}

/// In-memory verification results, one slot per session and form.
///
/// Each upload takes a sequence number from [`begin_upload`](Self::begin_upload);
/// only the result for the newest number is kept, so a slow verification of an
/// older image can never overwrite a newer one. Numbers come from one
/// store-wide counter and are never reused, even after a key is cleared or
/// evicted. Entries untouched for longer than the TTL are dropped.
#[derive(Debug)]
pub struct VerificationStore {
    entries: RwLock<HashMap<SessionKey, Entry>>,
    next_seq: AtomicU64,
    ttl: Duration,
}

impl Default for VerificationStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

impl VerificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            next_seq: AtomicU64::new(0),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Register a new upload for `key` and drop any result for the previous image.
    pub async fn begin_upload(&self, key: SessionKey) -> u64 {
        let now = Utc::now();
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed) + 1;

        let mut entries = self.entries.write().await;
        let ttl = self.ttl;
        entries.retain(|k, entry| *k == key || !entry.is_expired(now, ttl));

        let entry = entries.entry(key).or_insert_with(|| Entry {
            latest_seq: 0,
            stored: None,
            touched_at: now,
        });
        entry.latest_seq = seq;
        entry.stored = None;
        entry.touched_at = now;
        seq
    }

    /// Store `result` if `upload_seq` is still the newest upload for `key`.
    ///
    /// Returns false when the result is stale (or the session was cleared).
    pub async fn record(&self, key: SessionKey, upload_seq: u64, result: VerificationResult) -> bool {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        match entries.get_mut(&key) {
            Some(entry) if entry.latest_seq == upload_seq => {
                entry.stored = Some(StoredVerification {
                    upload_seq,
                    result,
                    verified_at: now,
                });
                entry.touched_at = now;
                true
            }
            _ => {
                tracing::debug!(
                    session_id = %key.session_id,
                    form = %key.form,
                    upload_seq,
                    "Discarding stale verification result"
                );
                false
            }
        }
    }

    /// Latest result for `key`, unless the entry has expired.
    pub async fn latest(&self, key: SessionKey) -> Option<StoredVerification> {
        let now = Utc::now();
        let entries = self.entries.read().await;
        entries
            .get(&key)
            .filter(|entry| !entry.is_expired(now, self.ttl))
            .and_then(|entry| entry.stored.clone())
    }

    pub async fn clear(&self, key: SessionKey) {
        self.entries.write().await.remove(&key);
    }

    /// Remove every form's entry for `session_id`. Returns how many were removed.
    pub async fn clear_session(&self, session_id: Uuid) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| key.session_id != session_id);
        before - entries.len()
    }

    /// Drop entries untouched for longer than the TTL. Returns how many were removed.
    pub async fn evict_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now, self.ttl));
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = entries.len(), "Evicted expired verification sessions");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
