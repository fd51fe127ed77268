//! Structured logging schema and field name constants for ainotes.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log output can be filtered by the same names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Local cache could not be written, data may be at risk |
//! | WARN  | Remote store unreachable, local fallback applied |
//! | INFO  | Lifecycle events (startup, config), operation completions |
//! | DEBUG | Decision points (offline skip, temporary-id skip, merge sizes) |
//! | TRACE | Per-note iteration |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "sync", "store", "cloud", "inference", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Logical operation name.
/// Examples: "fetch_active", "create", "update", "delete", "refine"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Note identity being operated on (display form).
pub const NOTE_ID: &str = "note_id";

/// Owner of the notes being operated on.
pub const USER_ID: &str = "user_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of notes returned by a listing.
pub const RESULT_COUNT: &str = "result_count";

/// Number of local-only notes merged ahead of cloud notes.
pub const PENDING_COUNT: &str = "pending_count";

/// Number of notes held in the local cache after a write.
pub const CACHE_SIZE: &str = "cache_size";

/// Byte length of text sent to the refiner.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of a refiner response.
pub const RESPONSE_LEN: &str = "response_len";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Model name used for refinement.
pub const MODEL: &str = "model";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const ALL: &[&str] = &[
        SUBSYSTEM,
        OPERATION,
        NOTE_ID,
        USER_ID,
        DURATION_MS,
        RESULT_COUNT,
        PENDING_COUNT,
        CACHE_SIZE,
        PROMPT_LEN,
        RESPONSE_LEN,
        MODEL,
        SUCCESS,
        ERROR_MSG,
    ];

    #[test]
    fn test_field_names_unique() {
        let unique: HashSet<_> = ALL.iter().collect();
        assert_eq!(unique.len(), ALL.len());
    }

    #[test]
    fn test_field_names_are_snake_case() {
        for name in ALL {
            assert!(
                name.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
                "{} is not snake_case",
                name
            );
        }
    }
}
