//! Core traits for ainotes abstractions.
//!
//! These traits define the collaborators the sync engine works against,
//! enabling pluggable storage backends and testability.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::*;

// =============================================================================
// LOCAL CACHE
// =============================================================================

/// Durable on-device storage of notes for every user of the device.
///
/// The collection is flat: partitioning by user happens in memory.
pub trait LocalCacheStore: Send + Sync {
    /// Every cached note across all users.
    ///
    /// Never fails: missing or corrupt storage reads as empty.
    fn read_all(&self) -> Vec<Note>;

    /// Replace the whole cached collection.
    ///
    /// Callers never observe a partially written collection.
    fn write_all(&self, notes: &[Note]) -> Result<()>;
}

// =============================================================================
// REMOTE STORE
// =============================================================================

/// Hosted note table scoped by user.
///
/// Every method fails with [`crate::Error::Unreachable`] when the store
/// cannot be contacted or rejects the call. Notes returned by the store
/// carry `Persisted` identities.
#[async_trait]
pub trait RemoteNoteStore: Send + Sync {
    /// List a user's notes matching `filter`, ordered by `sort`.
    async fn query_notes(
        &self,
        user_id: &str,
        filter: NoteFilter,
        sort: &[SortKey],
    ) -> Result<Vec<Note>>;

    /// Insert a note and return it with its remote-assigned identity.
    async fn insert_note(&self, user_id: &str, note: NoteInsert) -> Result<Note>;

    /// Apply an update field set to the note with the given remote id.
    async fn update_note(
        &self,
        id: &str,
        update: &NoteUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Delete the note with the given remote id. Best effort.
    async fn delete_note(&self, id: &str) -> Result<()>;

    /// When true the engine skips all remote calls (demo mode).
    fn is_offline_mode(&self) -> bool {
        false
    }
}

// =============================================================================
// TEXT REFINEMENT
// =============================================================================

/// AI text rewrite collaborator.
#[async_trait]
pub trait TextRefiner: Send + Sync {
    /// Rewrite non-empty `text`.
    ///
    /// Fails with `ServiceUnavailable` when not configured and with
    /// `RefinementFailed` when the call itself fails.
    async fn refine(&self, text: &str) -> Result<String>;

    /// Model used for refinement.
    fn model_name(&self) -> &str;
}
