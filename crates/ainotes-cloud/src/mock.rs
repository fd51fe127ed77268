//! In-memory remote store for deterministic testing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ainotes_cloud::mock::MockRemoteStore;
//! use ainotes_core::{NoteFilter, RemoteNoteStore, SortKey};
//!
//! #[tokio::test]
//! async fn test_with_mock_store() {
//!     let store = MockRemoteStore::new();
//!     store.set_unreachable(true);
//!
//!     let result = store
//!         .query_notes("u1", NoteFilter::active(), &SortKey::active_order())
//!         .await;
//!     assert!(result.is_err());
//! }
//! ```

use std::cmp::Ordering;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use ainotes_core::{
    Error, Note, NoteFilter, NoteId, NoteInsert, NoteUpdate, RemoteNoteStore, Result, SortField,
    SortKey,
};

/// Mock remote store. Clones share state.
#[derive(Clone, Default)]
pub struct MockRemoteStore {
    state: Arc<Mutex<MockState>>,
}

#[derive(Debug, Default)]
struct MockState {
    rows: Vec<Note>,
    unreachable: bool,
    offline: bool,
    latency_ms: u64,
    ack_latency_ms: u64,
    calls: Vec<MockCall>,
}

/// One recorded call against the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub operation: String,
    /// User id for queries and inserts, note id for updates and deletes.
    pub target: String,
}

impl MockRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with rows. Ids should be `Persisted`.
    pub fn with_notes(self, notes: Vec<Note>) -> Self {
        self.state.lock().unwrap().rows = notes;
        self
    }

    /// Delay every call by `latency_ms` before it takes effect.
    pub fn with_latency_ms(self, latency_ms: u64) -> Self {
        self.state.lock().unwrap().latency_ms = latency_ms;
        self
    }

    /// Delay the response of every write by `ack_latency_ms` after the
    /// write has taken effect.
    pub fn with_ack_latency_ms(self, ack_latency_ms: u64) -> Self {
        self.state.lock().unwrap().ack_latency_ms = ack_latency_ms;
        self
    }

    /// Make every subsequent call fail with `Unreachable`.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state.lock().unwrap().unreachable = unreachable;
    }

    /// Report demo mode through `is_offline_mode`.
    pub fn set_offline(&self, offline: bool) {
        self.state.lock().unwrap().offline = offline;
    }

    /// Current rows, in storage order.
    pub fn notes(&self) -> Vec<Note> {
        self.state.lock().unwrap().rows.clone()
    }

    /// Get all logged calls for assertion.
    pub fn calls(&self) -> Vec<MockCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Number of logged calls of one operation.
    pub fn call_count(&self, operation: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Log the call, wait out the latency, then check reachability.
    async fn enter(&self, operation: &str, target: &str) -> Result<()> {
        let latency_ms = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(MockCall {
                operation: operation.to_string(),
                target: target.to_string(),
            });
            state.latency_ms
        };

        if latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(latency_ms)).await;
        }

        if self.state.lock().unwrap().unreachable {
            return Err(Error::Unreachable(format!("mock {} failed", operation)));
        }
        Ok(())
    }

    /// Wait out the acknowledgement latency of a committed write.
    async fn acknowledge(&self) {
        let ack_latency_ms = self.state.lock().unwrap().ack_latency_ms;
        if ack_latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(ack_latency_ms)).await;
        }
    }
}

fn compare(a: &Note, b: &Note, sort: &[SortKey]) -> Ordering {
    for key in sort {
        let ord = match key.field {
            SortField::IsPinned => a.is_pinned.cmp(&b.is_pinned),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        let ord = if key.ascending { ord } else { ord.reverse() };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

#[async_trait]
impl RemoteNoteStore for MockRemoteStore {
    async fn query_notes(
        &self,
        user_id: &str,
        filter: NoteFilter,
        sort: &[SortKey],
    ) -> Result<Vec<Note>> {
        self.enter("query", user_id).await?;

        let state = self.state.lock().unwrap();
        let mut rows: Vec<Note> = state
            .rows
            .iter()
            .filter(|n| n.user_id == user_id && n.is_archived == filter.is_archived)
            .cloned()
            .map(|mut n| {
                n.is_synced = false;
                n
            })
            .collect();
        rows.sort_by(|a, b| compare(a, b, sort));
        Ok(rows)
    }

    async fn insert_note(&self, user_id: &str, note: NoteInsert) -> Result<Note> {
        self.enter("insert", user_id).await?;

        let now = Utc::now();
        let row = Note {
            id: NoteId::persisted(Uuid::new_v4().to_string()),
            user_id: user_id.to_string(),
            title: note.title,
            content: note.content,
            is_pinned: note.is_pinned,
            is_archived: note.is_archived,
            created_at: now,
            updated_at: now,
            color: note.color,
            is_synced: false,
        };
        self.state.lock().unwrap().rows.push(row.clone());
        self.acknowledge().await;
        Ok(row)
    }

    async fn update_note(
        &self,
        id: &str,
        update: &NoteUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        self.enter("update", id).await?;

        {
            let mut state = self.state.lock().unwrap();
            // Matching PostgREST, a patch that hits no row still succeeds.
            if let Some(row) = state
                .rows
                .iter_mut()
                .find(|n| n.id.remote_id() == Some(id))
            {
                row.apply(update, updated_at);
                row.updated_at = updated_at;
            }
        }
        self.acknowledge().await;
        Ok(())
    }

    async fn delete_note(&self, id: &str) -> Result<()> {
        self.enter("delete", id).await?;

        self.state
            .lock()
            .unwrap()
            .rows
            .retain(|n| n.id.remote_id() != Some(id));
        self.acknowledge().await;
        Ok(())
    }

    fn is_offline_mode(&self) -> bool {
        self.state.lock().unwrap().offline
    }
}
