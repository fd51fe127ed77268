//! UUID v7 utilities for time-ordered identifiers.
//!
//! Temporary note identities are UUIDv7 values: they embed a millisecond
//! timestamp, sort by creation time, and are never reused.

use uuid::Uuid;

/// Generate a new UUIDv7 identifier.
///
/// # Example
///
/// ```
/// use ainotes_core::uuid_utils::new_v7;
///
/// let a = new_v7();
/// let b = new_v7();
/// assert_ne!(a, b);
/// ```
#[inline]
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}
