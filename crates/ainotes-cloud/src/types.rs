//! Row types exchanged with the hosted note table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ainotes_core::{Note, NoteId, NoteInsert, NoteUpdate};

/// Primary key as returned by the table: uuid/text or bigint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Text(String),
    Number(i64),
}

impl RowId {
    pub fn into_string(self) -> String {
        match self {
            RowId::Text(s) => s,
            RowId::Number(n) => n.to_string(),
        }
    }
}

/// A row of the notes table.
#[derive(Debug, Clone, Deserialize)]
pub struct NoteRow {
    pub id: RowId,
    pub user_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub color: Option<String>,
}

impl NoteRow {
    /// Convert into a note with a persisted identity.
    ///
    /// `is_synced` is left false; confirming sync state is the engine's job.
    pub fn into_note(self) -> Note {
        Note {
            id: NoteId::Persisted(self.id.into_string()),
            user_id: self.user_id,
            title: self.title.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            is_pinned: self.is_pinned,
            is_archived: self.is_archived,
            created_at: self.created_at,
            updated_at: self.updated_at,
            color: self.color,
            is_synced: false,
        }
    }
}

/// Insert body. Server assigns `id`, `created_at`, `updated_at`.
#[derive(Debug, Serialize)]
pub struct InsertRow<'a> {
    pub user_id: &'a str,
    #[serde(flatten)]
    pub note: &'a NoteInsert,
}

/// Patch body: only the fields being changed, plus the new timestamp.
#[derive(Debug, Serialize)]
pub struct UpdateRow<'a> {
    #[serde(flatten)]
    pub update: &'a NoteUpdate,
    pub updated_at: DateTime<Utc>,
}
