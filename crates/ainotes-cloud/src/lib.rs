//! # ainotes-cloud
//!
//! Remote note store for ainotes.
//!
//! This crate provides:
//! - [`PostgrestNoteStore`]: client for a hosted PostgREST `notes` table
//!   (Supabase-style auth headers)
//! - [`CloudConfig`]: endpoint and credential configuration
//! - `mock::MockRemoteStore` (feature `mock`): in-memory store with
//!   switchable reachability for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use ainotes_cloud::PostgrestNoteStore;
//! use ainotes_core::{NoteFilter, RemoteNoteStore, SortKey};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = PostgrestNoteStore::from_env().unwrap();
//!     let notes = store
//!         .query_notes("user-1", NoteFilter::active(), &SortKey::active_order())
//!         .await
//!         .unwrap();
//! }
//! ```

pub mod config;
pub mod postgrest;
pub mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use config::CloudConfig;
pub use postgrest::PostgrestNoteStore;

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockCall, MockRemoteStore};
