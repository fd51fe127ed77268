//! # ainotes-sync
//!
//! Offline-first reconciliation between the on-device note cache and the
//! hosted note table.
//!
//! [`NoteSync`] writes every change to the local cache before it contacts
//! the remote store, hands out temporary ids for notes the remote store has
//! not accepted yet, and promotes them to permanent ids once it has.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use ainotes_core::NoteDraft;
//! use ainotes_store::JsonFileCache;
//! use ainotes_sync::{NoteSync, SyncConfig};
//!
//! # async fn run() -> ainotes_core::Result<()> {
//! let cache = Arc::new(JsonFileCache::new(JsonFileCache::default_path()));
//! let sync = NoteSync::new(cache, SyncConfig::offline());
//!
//! let note = sync.create("user-1", NoteDraft::new("Groceries", "milk")).await?;
//! let active = sync.fetch_active("user-1").await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;

pub use config::{SyncConfig, SyncMode};
pub use engine::{NoteSync, SyncReport};
