//! # ainotes-store
//!
//! Local cache store implementations for ainotes.
//!
//! This crate provides:
//! - [`JsonFileCache`]: durable cache in a single JSON file, replaced
//!   atomically on every write
//! - [`MemoryCache`]: process-local cache for tests and ephemeral sessions
//!
//! ## Example
//!
//! ```rust,no_run
//! use ainotes_store::JsonFileCache;
//! use ainotes_core::LocalCacheStore;
//!
//! let cache = JsonFileCache::new("/tmp/ainotes/cache.json");
//! let notes = cache.read_all();
//! cache.write_all(&notes).unwrap();
//! ```

pub mod file;
pub mod memory;

pub use file::JsonFileCache;
pub use memory::MemoryCache;
