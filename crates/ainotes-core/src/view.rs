//! Listing helpers for presentation layers: search, ordering, pin grouping.

use crate::models::Note;

/// Client-side ordering of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    #[default]
    UpdatedAt,
    CreatedAt,
}

/// Notes whose title or content contains `query`, ignoring case.
///
/// A blank query matches every note.
pub fn search<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    let needle = query.trim().to_lowercase();
    notes
        .iter()
        .filter(|n| {
            needle.is_empty()
                || n.title.to_lowercase().contains(&needle)
                || n.content.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Sort newest first by the chosen timestamp. Stable.
pub fn sort(notes: &mut [&Note], by: SortOption) {
    match by {
        SortOption::UpdatedAt => notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        SortOption::CreatedAt => notes.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}

/// Split into (pinned, others), preserving order within each group.
pub fn partition_pinned<'a>(notes: Vec<&'a Note>) -> (Vec<&'a Note>, Vec<&'a Note>) {
    notes.into_iter().partition(|n| n.is_pinned)
}
