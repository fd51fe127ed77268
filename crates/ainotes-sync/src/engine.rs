//! Reconciliation engine.
//!
//! Every operation applies its effect to the local cache first and only then
//! talks to the remote store. Remote failures never reach the caller: the
//! cache stays authoritative and the note keeps `is_synced = false`.
//!
//! Cache read-modify-write sequences run under one async mutex so that two
//! operations never overwrite each other's snapshot. Remote calls are made
//! outside that lock.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, error, info, warn};

use ainotes_core::{
    Error, LocalCacheStore, Note, NoteDraft, NoteFilter, NoteId, NoteUpdate, RefineMode,
    RefineResult, RemoteNoteStore, Result, SortKey, TextRefiner,
};

use crate::config::SyncConfig;

/// Outcome of an explicit [`NoteSync::resync`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Local-only notes inserted remotely and promoted.
    pub inserted: usize,
    /// Persisted notes whose local state was re-sent.
    pub updated: usize,
    /// Notes whose remote call failed; they stay unsynced.
    pub failed: usize,
    /// Local-only notes skipped because a create is already inserting them.
    pub skipped: usize,
}

impl SyncReport {
    pub fn attempted(&self) -> usize {
        self.inserted + self.updated + self.failed
    }
}

/// Offline-first note engine over a local cache and an optional remote store.
pub struct NoteSync {
    cache: Arc<dyn LocalCacheStore>,
    config: SyncConfig,
    refiner: Option<Arc<dyn TextRefiner>>,
    cache_lock: AsyncMutex<()>,
    /// Temporary ids whose remote insert is in flight.
    inserting: Mutex<HashSet<NoteId>>,
}

impl NoteSync {
    pub fn new(cache: Arc<dyn LocalCacheStore>, config: SyncConfig) -> Self {
        info!(
            subsystem = "sync",
            mode = ?config.mode,
            offline = config.is_offline(),
            "Note sync engine initialized"
        );
        Self {
            cache,
            config,
            refiner: None,
            cache_lock: AsyncMutex::new(()),
            inserting: Mutex::new(HashSet::new()),
        }
    }

    /// Attach the AI refine collaborator.
    pub fn with_refiner(mut self, refiner: Arc<dyn TextRefiner>) -> Self {
        self.refiner = Some(refiner);
        self
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn is_offline(&self) -> bool {
        self.config.is_offline()
    }

    /// The remote store, unless every remote call must be skipped.
    fn remote(&self) -> Option<Arc<dyn RemoteNoteStore>> {
        if self.config.is_offline() {
            return None;
        }
        self.config.remote.clone()
    }

    /// Run `f` over the cached collection under the cache lock.
    ///
    /// The collection is written back only when `f` returns `Some`.
    async fn mutate<T>(&self, f: impl FnOnce(&mut Vec<Note>) -> Option<T>) -> Result<Option<T>> {
        let _guard = self.cache_lock.lock().await;
        let mut notes = self.cache.read_all();
        match f(&mut notes) {
            Some(out) => {
                if let Err(e) = self.cache.write_all(&notes) {
                    error!(
                        subsystem = "sync",
                        note_count = notes.len(),
                        error = %e,
                        "Local cache could not be written"
                    );
                    return Err(e);
                }
                Ok(Some(out))
            }
            None => Ok(None),
        }
    }

    fn local_slice(&self, user_id: &str, archived: bool) -> Vec<Note> {
        self.cache
            .read_all()
            .into_iter()
            .filter(|n| n.user_id == user_id && n.is_archived == archived)
            .collect()
    }

    fn mark_inserting(&self, id: &NoteId) -> bool {
        self.inserting
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(id.clone())
    }

    fn clear_inserting(&self, id: &NoteId) {
        self.inserting
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .remove(id);
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// The user's active notes: local-only notes first, then the cloud listing.
    ///
    /// When the remote store answers, the user's active slice of the cache is
    /// replaced by the merged result. Archived notes and other users' notes
    /// are left as they are.
    pub async fn fetch_active(&self, user_id: &str) -> Result<Vec<Note>> {
        let start = Instant::now();

        let Some(remote) = self.remote() else {
            debug!(subsystem = "sync", op = "fetch_active", user_id = %user_id, "Offline, serving cache");
            return Ok(self.local_slice(user_id, false));
        };

        let cloud = match remote
            .query_notes(user_id, NoteFilter::active(), &SortKey::active_order())
            .await
        {
            Ok(notes) => notes.into_iter().map(Note::synced).collect::<Vec<_>>(),
            Err(e) => {
                warn!(
                    subsystem = "sync",
                    op = "fetch_active",
                    user_id = %user_id,
                    error = %e,
                    "Remote listing failed, showing device copy"
                );
                return Ok(self.local_slice(user_id, false));
            }
        };

        let merged = self
            .mutate(|notes| {
                let cloud_ids: HashSet<&NoteId> = cloud.iter().map(|n| &n.id).collect();

                let pending: Vec<Note> = notes
                    .iter()
                    .filter(|n| {
                        n.user_id == user_id
                            && !n.is_archived
                            && n.id.is_temporary()
                            && !cloud_ids.contains(&n.id)
                    })
                    .cloned()
                    .collect();

                let mut merged = pending;
                merged.extend(cloud.iter().cloned());

                let merged_ids: HashSet<&NoteId> = merged.iter().map(|n| &n.id).collect();
                let kept: Vec<Note> = notes
                    .iter()
                    .filter(|n| {
                        let own_active = n.user_id == user_id && !n.is_archived;
                        !own_active && !merged_ids.contains(&n.id)
                    })
                    .cloned()
                    .collect();

                *notes = merged.iter().cloned().chain(kept).collect();
                Some(merged)
            })
            .await?
            .unwrap_or_default();

        debug!(
            subsystem = "sync",
            op = "fetch_active",
            user_id = %user_id,
            result_count = merged.len(),
            pending_count = merged.iter().filter(|n| n.id.is_temporary()).count(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Merged cloud listing"
        );
        Ok(merged)
    }

    /// The user's archived notes, most recently updated first.
    ///
    /// The cache is not rewritten. Without the remote store, the archived
    /// slice of the cache is returned in cache order.
    pub async fn fetch_archived(&self, user_id: &str) -> Result<Vec<Note>> {
        let Some(remote) = self.remote() else {
            debug!(subsystem = "sync", op = "fetch_archived", user_id = %user_id, "Offline, serving cache");
            return Ok(self.local_slice(user_id, true));
        };

        match remote
            .query_notes(user_id, NoteFilter::archived(), &SortKey::archived_order())
            .await
        {
            Ok(notes) => {
                debug!(
                    subsystem = "sync",
                    op = "fetch_archived",
                    user_id = %user_id,
                    result_count = notes.len(),
                    "Fetched archived notes"
                );
                Ok(notes.into_iter().map(Note::synced).collect())
            }
            Err(e) => {
                warn!(
                    subsystem = "sync",
                    op = "fetch_archived",
                    user_id = %user_id,
                    error = %e,
                    "Remote listing failed, showing device copy"
                );
                Ok(self.local_slice(user_id, true))
            }
        }
    }

    /// Resolve a user-visible id (as rendered by `NoteId`'s `Display`) to a
    /// cached note of `user_id`.
    pub fn find(&self, user_id: &str, key: &str) -> Option<Note> {
        self.cache
            .read_all()
            .into_iter()
            .find(|n| n.user_id == user_id && n.id.to_string() == key)
    }

    /// Cached notes of `user_id` not yet confirmed by the remote store.
    pub fn unsynced(&self, user_id: &str) -> Vec<Note> {
        self.cache
            .read_all()
            .into_iter()
            .filter(|n| n.user_id == user_id && !n.is_synced)
            .collect()
    }

    // =========================================================================
    // WRITES
    // =========================================================================

    /// Create a note.
    ///
    /// Returns `None` when title and content are both blank. Otherwise the
    /// note is in the cache under a temporary id before any remote call, and
    /// the returned note carries its permanent id only if the remote insert
    /// succeeded.
    pub async fn create(&self, user_id: &str, draft: NoteDraft) -> Result<Option<Note>> {
        if draft.is_blank() {
            debug!(subsystem = "sync", op = "create", user_id = %user_id, "Blank draft discarded");
            return Ok(None);
        }

        let note = Note::from_draft(user_id, &draft.trimmed(), Utc::now());
        self.mutate(|notes| {
            notes.insert(0, note.clone());
            Some(())
        })
        .await?;

        debug!(subsystem = "sync", op = "create", note_id = %note.id, user_id = %user_id, "Note cached");

        let Some(remote) = self.remote() else {
            return Ok(Some(note));
        };

        self.mark_inserting(&note.id);
        let result = self.insert_and_promote(remote.as_ref(), &note).await;
        self.clear_inserting(&note.id);

        Ok(Some(result?.unwrap_or(note)))
    }

    /// Insert a local-only note remotely and swap the temporary entry for the
    /// permanent one.
    ///
    /// Returns `None` if the insert failed. If the temporary entry was
    /// deleted while the insert was in flight, the new remote row is deleted
    /// again. If it was edited meanwhile, the local fields are kept under the
    /// permanent id and pushed. A copy of the row that a listing cached
    /// before the insert returned is dropped, so the permanent id appears
    /// once.
    async fn insert_and_promote(
        &self,
        remote: &dyn RemoteNoteStore,
        temp: &Note,
    ) -> Result<Option<Note>> {
        let row = match remote.insert_note(&temp.user_id, temp.to_insert()).await {
            Ok(row) => row,
            Err(e) => {
                warn!(
                    subsystem = "sync",
                    op = "create",
                    note_id = %temp.id,
                    error = %e,
                    "Remote insert failed, note kept locally"
                );
                return Ok(None);
            }
        };

        let promoted = self
            .mutate(|notes| {
                let before = notes.len();
                notes.retain(|n| n.id != row.id);
                let dropped_listed = notes.len() != before;

                let Some(entry) = notes.iter_mut().find(|n| n.id == temp.id) else {
                    return dropped_listed.then_some(None);
                };
                let mut promoted = if *entry == *temp {
                    row.clone().synced()
                } else {
                    let mut local = entry.clone();
                    local.id = row.id.clone();
                    local.is_synced = false;
                    local
                };
                promoted.updated_at = promoted.updated_at.max(entry.updated_at);
                *entry = promoted.clone();
                Some(Some(promoted))
            })
            .await?
            .flatten();

        let Some(promoted) = promoted else {
            // Deleted while the insert was in flight.
            if let Some(remote_id) = row.id.remote_id() {
                if let Err(e) = remote.delete_note(remote_id).await {
                    warn!(
                        subsystem = "sync",
                        op = "create",
                        note_id = %row.id,
                        error = %e,
                        "Cleanup delete of promoted note failed"
                    );
                }
            }
            debug!(subsystem = "sync", op = "create", note_id = %temp.id, "Note deleted before promotion");
            return Ok(Some(temp.clone()));
        };

        debug!(
            subsystem = "sync",
            op = "create",
            note_id = %temp.id,
            remote_id = %promoted.id,
            "Promoted to permanent id"
        );

        if promoted.is_synced {
            return Ok(Some(promoted));
        }

        // Edited while the insert was in flight: push the newer local state.
        let update = NoteUpdate::from_note(&promoted);
        Ok(Some(self.push_update(remote, promoted, &update).await?))
    }

    /// Send `update` for a persisted note and confirm it if the cached entry
    /// still holds exactly the state that was sent.
    async fn push_update(
        &self,
        remote: &dyn RemoteNoteStore,
        note: Note,
        update: &NoteUpdate,
    ) -> Result<Note> {
        let Some(remote_id) = note.id.remote_id() else {
            return Ok(note);
        };

        if let Err(e) = remote.update_note(remote_id, update, note.updated_at).await {
            warn!(
                subsystem = "sync",
                op = "update",
                note_id = %note.id,
                error = %e,
                "Remote update failed, note left unsynced"
            );
            return Ok(note);
        }

        let confirmed = self
            .mutate(|notes| {
                let entry = notes
                    .iter_mut()
                    .find(|n| **n == note)?;
                entry.is_synced = true;
                Some(entry.clone())
            })
            .await?;

        match confirmed {
            Some(confirmed) => Ok(confirmed),
            None => {
                debug!(
                    subsystem = "sync",
                    op = "update",
                    note_id = %note.id,
                    "Note changed or removed before confirmation"
                );
                Ok(note)
            }
        }
    }

    /// Apply `update` to a cached note.
    ///
    /// Returns the note as it stands after the call, or `None` if it is not
    /// in the cache. Temporary notes and offline engines stop after the
    /// local write. A persisted note missing from the cache, such as one
    /// seen only in a remote listing, is still updated remotely.
    pub async fn update(&self, id: &NoteId, update: NoteUpdate) -> Result<Option<Note>> {
        let now = Utc::now();
        let updated = self
            .mutate(|notes| {
                let entry = notes.iter_mut().find(|n| &n.id == id)?;
                entry.apply(&update, now);
                Some(entry.clone())
            })
            .await?;

        let Some(note) = updated else {
            self.update_uncached(id, &update, now).await;
            return Ok(None);
        };

        if note.id.is_temporary() {
            debug!(subsystem = "sync", op = "update", note_id = %id, "Temporary id, remote update skipped");
            return Ok(Some(note));
        }

        let Some(remote) = self.remote() else {
            debug!(subsystem = "sync", op = "update", note_id = %id, "Offline, remote update skipped");
            return Ok(Some(note));
        };

        Ok(Some(self.push_update(remote.as_ref(), note, &update).await?))
    }

    async fn update_uncached(&self, id: &NoteId, update: &NoteUpdate, now: DateTime<Utc>) {
        let (Some(remote_id), Some(remote)) = (id.remote_id(), self.remote()) else {
            debug!(subsystem = "sync", op = "update", note_id = %id, "Note not in cache, remote update skipped");
            return;
        };

        match remote.update_note(remote_id, update, now).await {
            Ok(()) => debug!(subsystem = "sync", op = "update", note_id = %id, "Uncached note updated remotely"),
            Err(e) => warn!(
                subsystem = "sync",
                op = "update",
                note_id = %id,
                error = %e,
                "Remote update of uncached note failed"
            ),
        }
    }

    pub async fn set_pinned(&self, id: &NoteId, pinned: bool) -> Result<Option<Note>> {
        self.update(id, NoteUpdate::new().pinned(pinned)).await
    }

    /// Archive or restore a note. Callers drop it from the listing they show.
    pub async fn set_archived(&self, id: &NoteId, archived: bool) -> Result<Option<Note>> {
        self.update(id, NoteUpdate::new().archived(archived)).await
    }

    /// Remove a note from the cache and, if it was persisted, from the
    /// remote store. Returns whether the cache held the note.
    pub async fn delete(&self, id: &NoteId) -> Result<bool> {
        let removed = self
            .mutate(|notes| {
                let before = notes.len();
                notes.retain(|n| &n.id != id);
                (notes.len() != before).then_some(())
            })
            .await?
            .is_some();

        let Some(remote_id) = id.remote_id() else {
            debug!(subsystem = "sync", op = "delete", note_id = %id, removed, "Temporary note deleted locally");
            return Ok(removed);
        };

        let Some(remote) = self.remote() else {
            debug!(subsystem = "sync", op = "delete", note_id = %id, removed, "Offline, remote delete skipped");
            return Ok(removed);
        };

        if let Err(e) = remote.delete_note(remote_id).await {
            warn!(
                subsystem = "sync",
                op = "delete",
                note_id = %id,
                error = %e,
                "Remote delete failed"
            );
        }
        Ok(removed)
    }

    /// Push every unsynced note of `user_id`.
    ///
    /// Never runs on its own: a failed remote write stays unsynced until the
    /// note is edited again or the caller invokes this.
    pub async fn resync(&self, user_id: &str) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        let Some(remote) = self.remote() else {
            debug!(subsystem = "sync", op = "resync", user_id = %user_id, "Offline, nothing pushed");
            return Ok(report);
        };

        for note in self.unsynced(user_id) {
            if note.id.is_temporary() {
                if !self.mark_inserting(&note.id) {
                    report.skipped += 1;
                    continue;
                }
                let result = self.insert_and_promote(remote.as_ref(), &note).await;
                self.clear_inserting(&note.id);
                match result? {
                    Some(promoted) if !promoted.id.is_temporary() => report.inserted += 1,
                    Some(_) => report.skipped += 1,
                    None => report.failed += 1,
                }
            } else {
                let update = NoteUpdate::from_note(&note);
                let pushed = self.push_update(remote.as_ref(), note, &update).await?;
                if pushed.is_synced {
                    report.updated += 1;
                } else {
                    report.failed += 1;
                }
            }
        }

        info!(
            subsystem = "sync",
            op = "resync",
            user_id = %user_id,
            inserted = report.inserted,
            updated = report.updated,
            failed = report.failed,
            skipped = report.skipped,
            "Resync complete"
        );
        Ok(report)
    }

    // =========================================================================
    // REFINE
    // =========================================================================

    /// Ask the refine collaborator to rewrite `text`.
    ///
    /// Blank text returns `None` without a call. Refine failures are
    /// returned to the caller; no fallback text is made up.
    pub async fn refine(&self, text: &str) -> Result<Option<RefineResult>> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let refiner = self
            .refiner
            .as_ref()
            .ok_or_else(|| Error::ServiceUnavailable("no refiner configured".to_string()))?;

        let start = Instant::now();
        let refined = refiner.refine(text).await?;
        debug!(
            subsystem = "sync",
            op = "refine",
            model = %refiner.model_name(),
            prompt_len = text.len(),
            response_len = refined.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Text refined"
        );

        Ok(Some(RefineResult {
            original: text.to_string(),
            refined,
        }))
    }

    /// Refine a cached note's content and store the result per `mode`.
    ///
    /// Returns `None` if the note is unknown or its content is blank.
    pub async fn refine_note(&self, id: &NoteId, mode: RefineMode) -> Result<Option<Note>> {
        let Some(note) = self.cache.read_all().into_iter().find(|n| &n.id == id) else {
            return Ok(None);
        };

        let Some(result) = self.refine(&note.content).await? else {
            return Ok(None);
        };

        self.update(id, NoteUpdate::new().content(result.apply(mode)))
            .await
    }
}
