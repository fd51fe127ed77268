//! Centralized default constants for ainotes.
//!
//! Crates reference these constants instead of defining their own magic
//! values.

// =============================================================================
// NOTES
// =============================================================================

/// Display tag assigned to notes created without an explicit color.
pub const NOTE_COLOR: &str = "transparent";

/// Prefix used when rendering a temporary note identity for humans.
///
/// Display only. Identities are never parsed back from this form.
pub const TEMP_ID_DISPLAY_PREFIX: &str = "temp-";

/// Separator placed between original and refined text when both are kept.
pub const REFINE_BOTH_SEPARATOR: &str = "\n\n---\nRefined:\n";

// =============================================================================
// LOCAL CACHE
// =============================================================================

/// File name of the on-device note cache.
pub const CACHE_FILE_NAME: &str = "ainotes_backup_storage.json";

/// Application directory name under the platform data/config dirs.
pub const APP_DIR_NAME: &str = "ainotes";

// =============================================================================
// CLOUD STORE
// =============================================================================

/// Remote table holding notes.
pub const CLOUD_TABLE: &str = "notes";

/// Request timeout for the remote store in seconds.
pub const CLOUD_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// REFINE
// =============================================================================

/// OpenAI-compatible endpoint of the Gemini API.
pub const REFINE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Default refinement model.
pub const REFINE_MODEL: &str = "gemini-3-flash-preview";

/// Sampling temperature for refinement. Low, to keep edits conservative.
pub const REFINE_TEMPERATURE: f32 = 0.3;

/// Request timeout for the refine backend in seconds.
pub const REFINE_TIMEOUT_SECS: u64 = 60;

/// System instruction sent with every refine request.
pub const REFINE_SYSTEM_PROMPT: &str = "Refine the following text by correcting grammar, tense, and sentence structure while preserving the original meaning and tone. Do not add new content. Improve clarity and readability. Return refined text only (no explanations or meta-talk).";
