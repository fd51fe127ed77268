//! Core data models for ainotes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::defaults;
use crate::uuid_utils::new_v7;

// =============================================================================
// NOTE IDENTITY
// =============================================================================

/// Identity of a note.
///
/// A note starts life with a locally generated `Temporary` token and is
/// promoted to a `Persisted` id once the remote store has accepted it. The
/// two namespaces are distinct variants, so a remote id can never be taken
/// for a temporary one regardless of its text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteId {
    /// Locally generated, not yet known to the remote store.
    Temporary(Uuid),
    /// Assigned by the remote store on insert.
    Persisted(String),
}

impl NoteId {
    /// Generate a fresh temporary identity.
    pub fn temporary() -> Self {
        NoteId::Temporary(new_v7())
    }

    /// Wrap a remote-assigned identity.
    pub fn persisted(id: impl Into<String>) -> Self {
        NoteId::Persisted(id.into())
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self, NoteId::Temporary(_))
    }

    /// The remote id, if this note has been persisted remotely.
    pub fn remote_id(&self) -> Option<&str> {
        match self {
            NoteId::Persisted(id) => Some(id),
            NoteId::Temporary(_) => None,
        }
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteId::Temporary(token) => write!(f, "{}{}", defaults::TEMP_ID_DISPLAY_PREFIX, token),
            NoteId::Persisted(id) => f.write_str(id),
        }
    }
}

// =============================================================================
// NOTE
// =============================================================================

/// A user's note as held by the local cache and returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub is_pinned: bool,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// True only while the local copy is confirmed equal to the remote one.
    #[serde(default)]
    pub is_synced: bool,
}

impl Note {
    /// Build a new local-only note from a draft.
    ///
    /// The note gets a temporary identity, `created_at == updated_at == now`,
    /// and starts unsynced and unarchived.
    pub fn from_draft(user_id: &str, draft: &NoteDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: NoteId::temporary(),
            user_id: user_id.to_string(),
            title: draft.title.clone(),
            content: draft.content.clone(),
            is_pinned: draft.is_pinned.unwrap_or(false),
            is_archived: false,
            created_at: now,
            updated_at: now,
            color: Some(
                draft
                    .color
                    .clone()
                    .unwrap_or_else(|| defaults::NOTE_COLOR.to_string()),
            ),
            is_synced: false,
        }
    }

    /// Apply an update field set, refresh `updated_at` and mark unsynced.
    ///
    /// `updated_at` never moves backwards, even if `now` is behind the
    /// previously stored timestamp.
    pub fn apply(&mut self, update: &NoteUpdate, now: DateTime<Utc>) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(content) = &update.content {
            self.content = content.clone();
        }
        if let Some(pinned) = update.is_pinned {
            self.is_pinned = pinned;
        }
        if let Some(archived) = update.is_archived {
            self.is_archived = archived;
        }
        if let Some(color) = &update.color {
            self.color = Some(color.clone());
        }
        self.updated_at = self.updated_at.max(now);
        self.is_synced = false;
    }

    /// Payload for inserting this note into the remote store.
    pub fn to_insert(&self) -> NoteInsert {
        NoteInsert {
            title: self.title.clone(),
            content: self.content.clone(),
            is_pinned: self.is_pinned,
            is_archived: self.is_archived,
            color: self.color.clone(),
        }
    }

    /// Mark as confirmed by the remote store.
    pub fn synced(mut self) -> Self {
        self.is_synced = true;
        self
    }
}

// =============================================================================
// REQUEST TYPES
// =============================================================================

/// Input for creating a note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub is_pinned: Option<bool>,
    #[serde(default)]
    pub color: Option<String>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn pinned(mut self, pinned: bool) -> Self {
        self.is_pinned = Some(pinned);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Copy with title and content trimmed.
    pub fn trimmed(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            is_pinned: self.is_pinned,
            color: self.color.clone(),
        }
    }

    /// True when both title and content are empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.content.trim().is_empty()
    }
}

/// The set of note fields that `update` may change.
///
/// Unset fields are left untouched. An empty set is valid and still
/// refreshes `updated_at`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_pinned: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl NoteUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn pinned(mut self, pinned: bool) -> Self {
        self.is_pinned = Some(pinned);
        self
    }

    pub fn archived(mut self, archived: bool) -> Self {
        self.is_archived = Some(archived);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.is_pinned.is_none()
            && self.is_archived.is_none()
            && self.color.is_none()
    }

    /// Every mutable field of `note`, used to re-send a note's full state.
    pub fn from_note(note: &Note) -> Self {
        Self {
            title: Some(note.title.clone()),
            content: Some(note.content.clone()),
            is_pinned: Some(note.is_pinned),
            is_archived: Some(note.is_archived),
            color: note.color.clone(),
        }
    }
}

/// Fields sent to the remote store when inserting a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteInsert {
    pub title: String,
    pub content: String,
    pub is_pinned: bool,
    pub is_archived: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

// =============================================================================
// QUERY TYPES
// =============================================================================

/// Filter applied to a remote note listing (always scoped to one user).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteFilter {
    pub is_archived: bool,
}

impl NoteFilter {
    pub fn active() -> Self {
        Self { is_archived: false }
    }

    pub fn archived() -> Self {
        Self { is_archived: true }
    }
}

/// Sortable note fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    IsPinned,
    UpdatedAt,
    CreatedAt,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::IsPinned => "is_pinned",
            SortField::UpdatedAt => "updated_at",
            SortField::CreatedAt => "created_at",
        }
    }
}

/// One ordering key of a remote listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub ascending: bool,
}

impl SortKey {
    pub fn desc(field: SortField) -> Self {
        Self {
            field,
            ascending: false,
        }
    }

    pub fn asc(field: SortField) -> Self {
        Self {
            field,
            ascending: true,
        }
    }

    /// Pinned first, then most recently updated.
    pub fn active_order() -> Vec<SortKey> {
        vec![
            SortKey::desc(SortField::IsPinned),
            SortKey::desc(SortField::UpdatedAt),
        ]
    }

    /// Most recently updated first.
    pub fn archived_order() -> Vec<SortKey> {
        vec![SortKey::desc(SortField::UpdatedAt)]
    }
}

// =============================================================================
// REFINEMENT
// =============================================================================

/// How a refinement is applied to the note text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefineMode {
    /// Replace the original text with the refined text.
    #[default]
    Replace,
    /// Keep the original and append the refined text below a separator.
    Both,
}

/// Original and refined text returned by a refine call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefineResult {
    pub original: String,
    pub refined: String,
}

impl RefineResult {
    /// Final note text for the chosen mode.
    pub fn apply(&self, mode: RefineMode) -> String {
        match mode {
            RefineMode::Replace => self.refined.clone(),
            RefineMode::Both => format!(
                "{}{}{}",
                self.original,
                defaults::REFINE_BOTH_SEPARATOR,
                self.refined
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_note_id_display() {
        let token = Uuid::nil();
        assert_eq!(
            NoteId::Temporary(token).to_string(),
            format!("temp-{}", token)
        );
        assert_eq!(NoteId::persisted("abc").to_string(), "abc");
    }

    #[test]
    fn test_persisted_id_with_temp_prefix_is_not_temporary() {
        let id = NoteId::persisted("temp-lookalike");
        assert!(!id.is_temporary());
        assert_eq!(id.remote_id(), Some("temp-lookalike"));
    }

    #[test]
    fn test_note_id_serde_is_tagged() {
        let json = serde_json::to_value(NoteId::persisted("42")).unwrap();
        assert_eq!(json, serde_json::json!({"persisted": "42"}));

        let temp = NoteId::temporary();
        let json = serde_json::to_string(&temp).unwrap();
        assert!(json.starts_with("{\"temporary\":"));
        let back: NoteId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, temp);
    }

    #[test]
    fn test_temporary_ids_are_unique() {
        assert_ne!(NoteId::temporary(), NoteId::temporary());
    }

    #[test]
    fn test_from_draft_defaults() {
        let now = ts(2024, 1, 1);
        let note = Note::from_draft("u1", &NoteDraft::new("A", "B"), now);
        assert!(note.id.is_temporary());
        assert_eq!(note.user_id, "u1");
        assert_eq!(note.created_at, now);
        assert_eq!(note.updated_at, now);
        assert!(!note.is_pinned);
        assert!(!note.is_archived);
        assert!(!note.is_synced);
        assert_eq!(note.color.as_deref(), Some("transparent"));
    }

    #[test]
    fn test_from_draft_keeps_pin_and_color() {
        let draft = NoteDraft::new("A", "").pinned(true).color("yellow");
        let note = Note::from_draft("u1", &draft, ts(2024, 1, 1));
        assert!(note.is_pinned);
        assert_eq!(note.color.as_deref(), Some("yellow"));
    }

    #[test]
    fn test_draft_blank_after_trim() {
        assert!(NoteDraft::new("  ", "\n\t").is_blank());
        assert!(!NoteDraft::new("", " x ").is_blank());
        assert_eq!(NoteDraft::new(" a ", " b\n").trimmed(), NoteDraft::new("a", "b"));
    }

    #[test]
    fn test_apply_empty_update_only_touches() {
        let mut note = Note::from_draft("u1", &NoteDraft::new("A", "B"), ts(2024, 1, 1));
        note.is_synced = true;
        let before = note.clone();

        note.apply(&NoteUpdate::new(), ts(2024, 2, 1));

        assert_eq!(note.title, before.title);
        assert_eq!(note.content, before.content);
        assert_eq!(note.is_pinned, before.is_pinned);
        assert_eq!(note.is_archived, before.is_archived);
        assert_eq!(note.updated_at, ts(2024, 2, 1));
        assert!(!note.is_synced);
    }

    #[test]
    fn test_apply_never_moves_updated_at_backwards() {
        let mut note = Note::from_draft("u1", &NoteDraft::new("A", "B"), ts(2024, 6, 1));
        note.apply(&NoteUpdate::new().title("C"), ts(2024, 1, 1));
        assert_eq!(note.title, "C");
        assert_eq!(note.updated_at, ts(2024, 6, 1));
    }

    #[test]
    fn test_apply_sets_fields() {
        let mut note = Note::from_draft("u1", &NoteDraft::new("A", "B"), ts(2024, 1, 1));
        let update = NoteUpdate::new()
            .content("new")
            .pinned(true)
            .archived(true)
            .color("blue");
        note.apply(&update, ts(2024, 1, 2));
        assert_eq!(note.title, "A");
        assert_eq!(note.content, "new");
        assert!(note.is_pinned);
        assert!(note.is_archived);
        assert_eq!(note.color.as_deref(), Some("blue"));
    }

    #[test]
    fn test_update_serializes_only_set_fields() {
        let json = serde_json::to_value(NoteUpdate::new().pinned(true)).unwrap();
        assert_eq!(json, serde_json::json!({"is_pinned": true}));
        assert!(NoteUpdate::new().is_empty());
        assert!(!NoteUpdate::new().archived(false).is_empty());
    }

    #[test]
    fn test_update_from_note_covers_all_fields() {
        let note = Note::from_draft("u1", &NoteDraft::new("A", "B"), ts(2024, 1, 1));
        let update = NoteUpdate::from_note(&note);
        assert_eq!(update.title.as_deref(), Some("A"));
        assert_eq!(update.content.as_deref(), Some("B"));
        assert_eq!(update.is_pinned, Some(false));
        assert_eq!(update.is_archived, Some(false));
    }

    #[test]
    fn test_sort_orders() {
        let active = SortKey::active_order();
        assert_eq!(active[0].field, SortField::IsPinned);
        assert!(!active[0].ascending);
        assert_eq!(active[1].field.as_str(), "updated_at");
        assert_eq!(SortKey::archived_order().len(), 1);
    }

    #[test]
    fn test_refine_apply_modes() {
        let result = RefineResult {
            original: "i has a idea".to_string(),
            refined: "I have an idea.".to_string(),
        };
        assert_eq!(result.apply(RefineMode::Replace), "I have an idea.");
        assert_eq!(
            result.apply(RefineMode::Both),
            "i has a idea\n\n---\nRefined:\nI have an idea."
        );
    }
}
